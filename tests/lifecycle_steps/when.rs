//! When steps for marketplace lifecycle BDD scenarios.

use super::given::terms;
use super::world::{LifecycleWorld, run_async};
use rstest_bdd_macros::when;
use tasklance::payment::services::PaymentRequest;
use tasklance::review::services::ReviewRequest;

#[when("the client accepts the first freelancer's bid")]
fn accept_first(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let bid_id = world
        .first_bid
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing first bid in scenario world"))?
        .id();
    let result = run_async(world.state.bids.accept_bid(&world.client, bid_id));
    if let Some(acceptance) = world.record(result) {
        world.task = Some(acceptance.task);
    }
    Ok(())
}

#[when("the client accepts the second freelancer's bid")]
fn accept_second(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let bid_id = world
        .second_bid
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing second bid in scenario world"))?
        .id();
    let result = run_async(world.state.bids.accept_bid(&world.client, bid_id));
    if let Some(acceptance) = world.record(result) {
        world.task = Some(acceptance.task);
    }
    Ok(())
}

#[when("the first freelancer bids on the task again")]
fn bid_again(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(
        world
            .state
            .bids
            .create_bid(&world.first_freelancer, task_id, terms()),
    );
    world.record(result);
    Ok(())
}

#[when("the client records a card payment for the task")]
fn record_payment(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let request = PaymentRequest {
        amount: 400.0,
        payment_method: "card".to_owned(),
        payment_gateway: None,
    };
    let result = run_async(
        world
            .state
            .payments
            .create_payment(&world.client, task_id, request),
    );
    world.last_payment = world.record(result);
    Ok(())
}

#[when("the client reviews the first freelancer with rating {score:i64}")]
fn review_first(world: &mut LifecycleWorld, score: i64) -> Result<(), eyre::Report> {
    let request = ReviewRequest {
        task_id: world.task()?.id(),
        reviewed_user_id: world.first_freelancer.id(),
        rating: score,
        comment: String::new(),
    };
    let result = run_async(world.state.reviews.create_review(&world.client, request));
    world.record(result);
    Ok(())
}
