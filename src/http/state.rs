//! Shared router state.

use super::Authenticator;
use crate::bid::{ports::BidRepository, services::BidLedgerService};
use crate::identity::{ports::UserRepository, services::IdentityService};
use crate::payment::{ports::PaymentRepository, services::PaymentLedgerService};
use crate::review::{ports::ReviewRepository, services::ReviewAggregatorService};
use crate::task::{ports::TaskRepository, services::TaskRegistryService};
use mockable::Clock;
use std::sync::Arc;

/// A complete set of repository adapters and the clock they share.
pub trait Stack: Send + Sync + 'static {
    /// User store.
    type Users: UserRepository + 'static;
    /// Task store.
    type Tasks: TaskRepository + 'static;
    /// Bid store.
    type Bids: BidRepository + 'static;
    /// Payment store.
    type Payments: PaymentRepository + 'static;
    /// Review store with rating recompute.
    type Reviews: ReviewRepository + 'static;
    /// Time source for every service.
    type Clock: Clock + Send + Sync + 'static;
}

/// Repositories handed to [`AppState::new`].
pub struct Repositories<S: Stack> {
    /// User store.
    pub users: Arc<S::Users>,
    /// Task store.
    pub tasks: Arc<S::Tasks>,
    /// Bid store.
    pub bids: Arc<S::Bids>,
    /// Payment store.
    pub payments: Arc<S::Payments>,
    /// Review store.
    pub reviews: Arc<S::Reviews>,
}

/// Services and authenticator shared by every handler.
pub struct AppState<S: Stack> {
    /// Account lookup and profile updates.
    pub identity: Arc<IdentityService<S::Users, S::Clock>>,
    /// Task posting and transitions.
    pub tasks: Arc<TaskRegistryService<S::Tasks, S::Clock>>,
    /// Bidding and acceptance.
    pub bids: Arc<BidLedgerService<S::Bids, S::Tasks, S::Clock>>,
    /// Payment records.
    pub payments: Arc<PaymentLedgerService<S::Payments, S::Tasks, S::Clock>>,
    /// Reviews and rating recompute.
    pub reviews: Arc<ReviewAggregatorService<S::Reviews, S::Tasks, S::Clock>>,
    /// Bearer-token resolution.
    pub authenticator: Arc<dyn Authenticator>,
}

impl<S: Stack> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
            tasks: Arc::clone(&self.tasks),
            bids: Arc::clone(&self.bids),
            payments: Arc::clone(&self.payments),
            reviews: Arc::clone(&self.reviews),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

impl<S: Stack> AppState<S> {
    /// Wires every service over the given repositories and clock.
    #[must_use]
    pub fn new(
        repositories: Repositories<S>,
        clock: Arc<S::Clock>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        let Repositories {
            users,
            tasks,
            bids,
            payments,
            reviews,
        } = repositories;

        Self {
            identity: Arc::new(IdentityService::new(users, Arc::clone(&clock))),
            tasks: Arc::new(TaskRegistryService::new(Arc::clone(&tasks), Arc::clone(&clock))),
            bids: Arc::new(BidLedgerService::new(
                bids,
                Arc::clone(&tasks),
                Arc::clone(&clock),
            )),
            payments: Arc::new(PaymentLedgerService::new(
                payments,
                Arc::clone(&tasks),
                Arc::clone(&clock),
            )),
            reviews: Arc::new(ReviewAggregatorService::new(reviews, tasks, clock)),
            authenticator,
        }
    }
}
