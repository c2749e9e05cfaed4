//! Given steps for marketplace lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasklance::bid::services::BidTermsRequest;
use tasklance::identity::domain::Role;
use tasklance::task::services::TaskDetailsRequest;

#[given("a registered client and two registered freelancers")]
fn registered_parties(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    world.client = world.register("client@example.com", Role::Client)?;
    world.first_freelancer = world.register("first@example.com", Role::Freelancer)?;
    world.second_freelancer = world.register("second@example.com", Role::Freelancer)?;
    Ok(())
}

#[given("the client has posted an open task")]
fn posted_task(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let request = TaskDetailsRequest::new(
        "Ledger export",
        "Port the billing exporter to the new ledger API",
        450.0,
        Utc::now() + Duration::days(14),
    );
    let task = run_async(world.state.tasks.create_task(&world.client, request))
        .wrap_err("post task for scenario")?;
    world.task = Some(task);
    Ok(())
}

pub(super) fn terms() -> BidTermsRequest {
    BidTermsRequest::new(
        400.0,
        Utc::now() + Duration::days(10),
        "Shipped three ledger migrations last year",
    )
}

#[given("the first freelancer has bid on the task")]
fn first_bid(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let bid = run_async(
        world
            .state
            .bids
            .create_bid(&world.first_freelancer, task_id, terms()),
    )
    .wrap_err("first freelancer bids")?;
    world.first_bid = Some(bid);
    Ok(())
}

#[given("the second freelancer has bid on the task")]
fn second_bid(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let bid = run_async(
        world
            .state
            .bids
            .create_bid(&world.second_freelancer, task_id, terms()),
    )
    .wrap_err("second freelancer bids")?;
    world.second_bid = Some(bid);
    Ok(())
}

#[given("the client has accepted the first freelancer's bid")]
fn accepted_first_bid(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let bid_id = world
        .first_bid
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing first bid in scenario world"))?
        .id();
    let acceptance = run_async(world.state.bids.accept_bid(&world.client, bid_id))
        .wrap_err("accept first bid")?;
    world.task = Some(acceptance.task);
    world.first_bid = Some(acceptance.bid);
    Ok(())
}

#[given("the task has been completed")]
fn completed_task(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let task = run_async(world.state.tasks.complete_task(task_id)).wrap_err("complete task")?;
    world.task = Some(task);
    Ok(())
}
