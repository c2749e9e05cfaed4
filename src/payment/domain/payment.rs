//! Payment aggregate root.

use super::{ParsePaymentStatusError, PaymentDomainError, PaymentId};
use crate::amount::Amount;
use crate::identity::domain::UserId;
use crate::task::domain::{Task, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment settlement status. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Recorded, not yet settled.
    Pending,
    /// Funds transferred.
    Completed,
    /// Transfer failed.
    Failed,
    /// Funds returned to the client.
    Refunded,
}

impl PaymentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = ParsePaymentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(ParsePaymentStatusError(value.to_owned())),
        }
    }
}

/// Payment aggregate root.
///
/// Client and freelancer are copied from the task when the payment is
/// recorded and never follow later task changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    id: PaymentId,
    task_id: TaskId,
    client_id: UserId,
    freelancer_id: UserId,
    amount: Amount,
    status: PaymentStatus,
    payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_gateway: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedPaymentData {
    /// Persisted identifier.
    pub id: PaymentId,
    /// Task paid for.
    pub task_id: TaskId,
    /// Paying client.
    pub client_id: UserId,
    /// Paid freelancer.
    pub freelancer_id: UserId,
    /// Persisted amount.
    pub amount: Amount,
    /// Persisted status.
    pub status: PaymentStatus,
    /// Persisted payment method.
    pub payment_method: String,
    /// Persisted processor reference.
    pub transaction_id: Option<String>,
    /// Persisted gateway label.
    pub payment_gateway: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Records a pending payment for `task`'s current owner and assignee.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentDomainError::Unassigned`] when the task has no
    /// freelancer, or a validation error for a non-positive amount or blank
    /// method.
    pub fn record(
        task: &Task,
        amount: f64,
        payment_method: &str,
        payment_gateway: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, PaymentDomainError> {
        let freelancer_id = task
            .freelancer_id()
            .ok_or(PaymentDomainError::Unassigned(task.id()))?;
        let validated_amount = Amount::new(amount).map_err(PaymentDomainError::InvalidAmount)?;
        let method = payment_method.trim();
        if method.is_empty() {
            return Err(PaymentDomainError::EmptyMethod);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: PaymentId::new(),
            task_id: task.id(),
            client_id: task.client_id(),
            freelancer_id,
            amount: validated_amount,
            status: PaymentStatus::Pending,
            payment_method: method.to_owned(),
            transaction_id: None,
            payment_gateway: non_blank(payment_gateway),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a payment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPaymentData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            client_id: data.client_id,
            freelancer_id: data.freelancer_id,
            amount: data.amount,
            status: data.status,
            payment_method: data.payment_method,
            transaction_id: data.transaction_id,
            payment_gateway: data.payment_gateway,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the payment identifier.
    #[must_use]
    pub const fn id(&self) -> PaymentId {
        self.id
    }

    /// Returns the task paid for.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the paying client.
    #[must_use]
    pub const fn client_id(&self) -> UserId {
        self.client_id
    }

    /// Returns the paid freelancer.
    #[must_use]
    pub const fn freelancer_id(&self) -> UserId {
        self.freelancer_id
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the settlement status.
    #[must_use]
    pub const fn status(&self) -> PaymentStatus {
        self.status
    }

    /// Returns the payment method.
    #[must_use]
    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    /// Returns the processor transaction reference, if any.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Returns the gateway label, if any.
    #[must_use]
    pub fn payment_gateway(&self) -> Option<&str> {
        self.payment_gateway.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Sets the status and, when a non-blank reference is given, replaces
    /// the transaction reference.
    pub fn settle(
        &mut self,
        status: PaymentStatus,
        transaction_id: Option<String>,
        clock: &impl Clock,
    ) {
        self.status = status;
        if let Some(reference) = non_blank(transaction_id) {
            self.transaction_id = Some(reference);
        }
        self.updated_at = clock.utc();
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}
