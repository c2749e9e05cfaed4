//! Shared world state for marketplace lifecycle BDD scenarios.

use std::sync::Arc;

use tasklance::access::Actor;
use tasklance::bid::domain::Bid;
use tasklance::error::{Classify, FailureKind};
use tasklance::http::{AppState, MemoryStack, StaticTokenAuthenticator};
use tasklance::identity::{
    domain::{Role, User, UserId},
    services::RegisterUserRequest,
};
use tasklance::payment::domain::Payment;
use tasklance::task::domain::Task;
use rstest::fixture;

/// Scenario world for lifecycle behaviour tests.
pub struct LifecycleWorld {
    pub state: AppState<MemoryStack>,
    pub client: Actor,
    pub first_freelancer: Actor,
    pub second_freelancer: Actor,
    pub task: Option<Task>,
    pub first_bid: Option<Bid>,
    pub second_bid: Option<Bid>,
    pub last_payment: Option<Payment>,
    pub last_failure: Option<FailureKind>,
}

impl LifecycleWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let state = AppState::in_memory(Arc::new(StaticTokenAuthenticator::default()));
        let placeholder = Actor::new(UserId::new(), Role::Client);
        Self {
            state,
            client: placeholder,
            first_freelancer: placeholder,
            second_freelancer: placeholder,
            task: None,
            first_bid: None,
            second_bid: None,
            last_payment: None,
            last_failure: None,
        }
    }

    /// Registers an account and returns its actor.
    pub fn register(&self, email: &str, role: Role) -> Result<Actor, eyre::Report> {
        let user: User = run_async(self.state.identity.register(RegisterUserRequest::new(
            email, "Ada", "Lovelace", role,
        )))?;
        Ok(Actor::new(user.id(), user.role()))
    }

    /// Returns the task posted in the background.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing posted task in scenario world"))
    }

    /// Records the failure classification of an operation, if any.
    pub fn record<T>(&mut self, result: Result<T, impl Classify>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_failure = None;
                Some(value)
            }
            Err(err) => {
                self.last_failure = Some(err.kind());
                None
            }
        }
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
