//! In-memory repository for bid ledger tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::bid::{
    domain::{Bid, BidId, BidStatus},
    ports::{BidRepository, BidRepositoryError, BidRepositoryResult},
};
use crate::identity::domain::UserId;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskId, TaskStatus},
};

/// Thread-safe in-memory bid repository.
///
/// Shares the task table with an [`InMemoryTaskRepository`] so acceptance
/// can write both under one pair of locks, always taken tasks first.
#[derive(Debug, Clone)]
pub struct InMemoryBidRepository {
    state: Arc<RwLock<InMemoryBidState>>,
    tasks: InMemoryTaskRepository,
}

#[derive(Debug, Default)]
struct InMemoryBidState {
    bids: HashMap<BidId, Bid>,
    bidders: HashSet<(TaskId, UserId)>,
}

impl InMemoryBidRepository {
    /// Creates an empty bid repository over the given task table.
    #[must_use]
    pub fn new(tasks: InMemoryTaskRepository) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryBidState::default())),
            tasks,
        }
    }

    fn write_state(&self) -> BidRepositoryResult<RwLockWriteGuard<'_, InMemoryBidState>> {
        self.state
            .write()
            .map_err(|err| BidRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn read_state(&self) -> BidRepositoryResult<RwLockReadGuard<'_, InMemoryBidState>> {
        self.state
            .read()
            .map_err(|err| BidRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl BidRepository for InMemoryBidRepository {
    async fn store(&self, bid: &Bid) -> BidRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.bids.contains_key(&bid.id()) {
            return Err(BidRepositoryError::DuplicateBid(bid.id()));
        }
        if !state.bidders.insert((bid.task_id(), bid.freelancer_id())) {
            return Err(BidRepositoryError::AlreadyBid {
                task_id: bid.task_id(),
                freelancer_id: bid.freelancer_id(),
            });
        }
        state.bids.insert(bid.id(), bid.clone());
        Ok(())
    }

    async fn update(&self, bid: &Bid) -> BidRepositoryResult<()> {
        let mut state = self.write_state()?;
        let stored = state
            .bids
            .get_mut(&bid.id())
            .ok_or(BidRepositoryError::NotFound(bid.id()))?;
        stored.adopt_terms(bid);
        Ok(())
    }

    async fn find_by_id(&self, id: BidId) -> BidRepositoryResult<Option<Bid>> {
        Ok(self.read_state()?.bids.get(&id).cloned())
    }

    async fn list_for_task(&self, task_id: TaskId) -> BidRepositoryResult<Vec<Bid>> {
        let state = self.read_state()?;
        let mut bids: Vec<Bid> = state
            .bids
            .values()
            .filter(|bid| bid.task_id() == task_id)
            .cloned()
            .collect();
        bids.sort_by_key(|bid| (bid.created_at(), bid.id()));
        Ok(bids)
    }

    async fn commit_acceptance(&self, bid: &Bid, task: &Task) -> BidRepositoryResult<(Bid, Task)> {
        let mut task_state = self.tasks.write_state()?;
        let mut state = self.write_state()?;

        let stored = state
            .bids
            .get_mut(&bid.id())
            .ok_or(BidRepositoryError::NotFound(bid.id()))?;
        if stored.status() != BidStatus::Pending {
            return Err(BidRepositoryError::StatusChanged {
                bid_id: bid.id(),
                actual: stored.status(),
            });
        }

        let assigned = task_state.transition_if_status(task, TaskStatus::Open)?;
        stored.adopt_status(bid);
        Ok((stored.clone(), assigned))
    }
}
