//! Concrete adapter stacks.

use super::{AppState, Authenticator, Repositories, Stack};
use crate::bid::adapters::{memory::InMemoryBidRepository, postgres::PostgresBidRepository};
use crate::db::PgPool;
use crate::identity::adapters::{memory::InMemoryUserRepository, postgres::PostgresUserRepository};
use crate::payment::adapters::{
    memory::InMemoryPaymentRepository, postgres::PostgresPaymentRepository,
};
use crate::review::adapters::{
    memory::InMemoryReviewRepository, postgres::PostgresReviewRepository,
};
use crate::task::adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository};
use mockable::DefaultClock;
use std::sync::Arc;

/// Process-local stores, used by tests and local demos.
#[derive(Debug, Clone, Copy)]
pub struct MemoryStack;

impl Stack for MemoryStack {
    type Users = InMemoryUserRepository;
    type Tasks = InMemoryTaskRepository;
    type Bids = InMemoryBidRepository;
    type Payments = InMemoryPaymentRepository;
    type Reviews = InMemoryReviewRepository;
    type Clock = DefaultClock;
}

/// Diesel-backed `PostgreSQL` stores sharing one pool.
#[derive(Debug, Clone, Copy)]
pub struct PostgresStack;

impl Stack for PostgresStack {
    type Users = PostgresUserRepository;
    type Tasks = PostgresTaskRepository;
    type Bids = PostgresBidRepository;
    type Payments = PostgresPaymentRepository;
    type Reviews = PostgresReviewRepository;
    type Clock = DefaultClock;
}

impl AppState<MemoryStack> {
    /// Builds empty in-memory stores. Bids see the same task table that
    /// the task registry writes, and reviews the same user table.
    #[must_use]
    pub fn in_memory(authenticator: Arc<dyn Authenticator>) -> Self {
        let users = InMemoryUserRepository::new();
        let tasks = InMemoryTaskRepository::new();
        let repositories = Repositories {
            reviews: Arc::new(InMemoryReviewRepository::new(users.clone())),
            bids: Arc::new(InMemoryBidRepository::new(tasks.clone())),
            users: Arc::new(users),
            tasks: Arc::new(tasks),
            payments: Arc::new(InMemoryPaymentRepository::new()),
        };
        Self::new(repositories, Arc::new(DefaultClock), authenticator)
    }
}

impl AppState<PostgresStack> {
    /// Builds `PostgreSQL` stores over a shared pool.
    #[must_use]
    pub fn postgres(pool: &PgPool, authenticator: Arc<dyn Authenticator>) -> Self {
        let repositories = Repositories {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
            bids: Arc::new(PostgresBidRepository::new(pool.clone())),
            payments: Arc::new(PostgresPaymentRepository::new(pool.clone())),
            reviews: Arc::new(PostgresReviewRepository::new(pool.clone())),
        };
        Self::new(repositories, Arc::new(DefaultClock), authenticator)
    }
}
