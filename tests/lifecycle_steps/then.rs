//! Then steps for marketplace lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use rstest_bdd_macros::then;
use tasklance::task::domain::TaskStatus;

#[then("the task is in progress and assigned to the first freelancer")]
fn assigned_to_first(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let stored = run_async(world.state.tasks.get_task(task_id))?;
    eyre::ensure!(
        stored.status() == TaskStatus::InProgress,
        "expected in_progress, found {}",
        stored.status()
    );
    eyre::ensure!(
        stored.freelancer_id() == Some(world.first_freelancer.id()),
        "unexpected assignee {:?}",
        stored.freelancer_id()
    );
    Ok(())
}

#[then("the task is still open without an assignee")]
fn still_open(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let stored = run_async(world.state.tasks.get_task(task_id))?;
    eyre::ensure!(stored.status() == TaskStatus::Open, "task left the open state");
    eyre::ensure!(stored.freelancer_id().is_none(), "open task has an assignee");
    Ok(())
}

#[then(r#"the operation fails with "{kind}""#)]
fn operation_fails(world: &LifecycleWorld, kind: String) -> Result<(), eyre::Report> {
    let failure = world
        .last_failure
        .ok_or_else(|| eyre::eyre!("expected a {kind} failure, but the operation succeeded"))?;
    eyre::ensure!(
        failure.as_str() == kind,
        "expected a {kind} failure, found {failure}"
    );
    Ok(())
}

#[then("the payment names the client and the first freelancer")]
fn payment_parties(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let payment = world
        .last_payment
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing recorded payment"))?;
    eyre::ensure!(payment.client_id() == world.client.id(), "client mismatch");
    eyre::ensure!(
        payment.freelancer_id() == world.first_freelancer.id(),
        "freelancer mismatch"
    );
    Ok(())
}

#[then("the first freelancer's rating is {expected:f64}")]
#[expect(
    clippy::float_arithmetic,
    reason = "Rating comparison needs a tolerance"
)]
fn rating_is(world: &LifecycleWorld, expected: f64) -> Result<(), eyre::Report> {
    let user = run_async(world.state.identity.find_user(world.first_freelancer.id()))?;
    let actual = user.rating().value();
    eyre::ensure!(
        (actual - expected).abs() < f64::EPSILON,
        "expected rating {expected}, found {actual}"
    );
    Ok(())
}
