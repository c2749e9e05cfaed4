//! In-memory repository for payment ledger tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::payment::{
    domain::{Payment, PaymentId},
    ports::{PaymentRepository, PaymentRepositoryError, PaymentRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory payment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentRepository {
    state: Arc<RwLock<HashMap<PaymentId, Payment>>>,
}

impl InMemoryPaymentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write_state(
        &self,
    ) -> PaymentRepositoryResult<RwLockWriteGuard<'_, HashMap<PaymentId, Payment>>> {
        self.state.write().map_err(|err| {
            PaymentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn read_state(
        &self,
    ) -> PaymentRepositoryResult<RwLockReadGuard<'_, HashMap<PaymentId, Payment>>> {
        self.state.read().map_err(|err| {
            PaymentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn store(&self, payment: &Payment) -> PaymentRepositoryResult<()> {
        let mut payments = self.write_state()?;
        if payments.contains_key(&payment.id()) {
            return Err(PaymentRepositoryError::DuplicatePayment(payment.id()));
        }
        payments.insert(payment.id(), payment.clone());
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> PaymentRepositoryResult<()> {
        let mut payments = self.write_state()?;
        let stored = payments
            .get_mut(&payment.id())
            .ok_or(PaymentRepositoryError::NotFound(payment.id()))?;
        *stored = payment.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> PaymentRepositoryResult<Option<Payment>> {
        Ok(self.read_state()?.get(&id).cloned())
    }

    async fn list_for_task(&self, task_id: TaskId) -> PaymentRepositoryResult<Vec<Payment>> {
        let payments = self.read_state()?;
        let mut matching: Vec<Payment> = payments
            .values()
            .filter(|payment| payment.task_id() == task_id)
            .cloned()
            .collect();
        matching.sort_by_key(|payment| (payment.created_at(), payment.id()));
        Ok(matching)
    }
}
