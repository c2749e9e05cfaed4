//! Bid aggregate root.

use super::{BidDomainError, BidId, ParseBidStatusError};
use crate::amount::Amount;
use crate::identity::domain::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bid lifecycle status.
///
/// `pending → accepted` happens at most once per task. `rejected` is only
/// ever read back from storage; sibling bids are not rejected when another
/// bid is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// Awaiting the client's decision.
    Pending,
    /// Chosen by the client; the task is assigned to the bidder.
    Accepted,
    /// Declined.
    Rejected,
}

impl BidStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BidStatus {
    type Error = ParseBidStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseBidStatusError(value.to_owned())),
        }
    }
}

/// Validated, freelancer-editable bid fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidTerms {
    amount: Amount,
    proposed_deadline: DateTime<Utc>,
    cover_letter: String,
}

impl BidTerms {
    /// Validates bid fields.
    ///
    /// # Errors
    ///
    /// Returns [`BidDomainError`] when the amount is not positive, the
    /// deadline is absent, or the cover letter is blank.
    pub fn new(
        amount: f64,
        proposed_deadline: Option<DateTime<Utc>>,
        cover_letter: impl Into<String>,
    ) -> Result<Self, BidDomainError> {
        let validated_amount = Amount::new(amount).map_err(BidDomainError::InvalidAmount)?;
        let deadline = proposed_deadline.ok_or(BidDomainError::MissingDeadline)?;
        let letter = cover_letter.into();
        if letter.trim().is_empty() {
            return Err(BidDomainError::EmptyCoverLetter);
        }

        Ok(Self {
            amount: validated_amount,
            proposed_deadline: deadline,
            cover_letter: letter.trim().to_owned(),
        })
    }

    /// Returns the offered amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the proposed delivery deadline.
    #[must_use]
    pub const fn proposed_deadline(&self) -> DateTime<Utc> {
        self.proposed_deadline
    }

    /// Returns the cover letter.
    #[must_use]
    pub fn cover_letter(&self) -> &str {
        &self.cover_letter
    }
}

/// Bid aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bid {
    id: BidId,
    task_id: TaskId,
    freelancer_id: UserId,
    #[serde(flatten)]
    terms: BidTerms,
    status: BidStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted bid.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedBidData {
    /// Persisted identifier.
    pub id: BidId,
    /// Task the bid targets.
    pub task_id: TaskId,
    /// Bidding freelancer.
    pub freelancer_id: UserId,
    /// Persisted terms.
    pub terms: BidTerms,
    /// Persisted status.
    pub status: BidStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Bid {
    /// Submits a new pending bid.
    #[must_use]
    pub fn submit(
        task_id: TaskId,
        freelancer_id: UserId,
        terms: BidTerms,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: BidId::new(),
            task_id,
            freelancer_id,
            terms,
            status: BidStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a bid from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBidData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            freelancer_id: data.freelancer_id,
            terms: data.terms,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the bid identifier.
    #[must_use]
    pub const fn id(&self) -> BidId {
        self.id
    }

    /// Returns the task this bid targets.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the bidding freelancer.
    #[must_use]
    pub const fn freelancer_id(&self) -> UserId {
        self.freelancer_id
    }

    /// Returns the bid terms.
    #[must_use]
    pub const fn terms(&self) -> &BidTerms {
        &self.terms
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> BidStatus {
        self.status
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

    /// Replaces the terms. Accepted and rejected bids remain editable.
    pub fn revise(&mut self, terms: BidTerms, clock: &impl Clock) {
        self.terms = terms;
        self.updated_at = clock.utc();
    }

    /// Copies the terms and update timestamp of `revised`, keeping this
    /// bid's status.
    pub(crate) fn adopt_terms(&mut self, revised: &Self) {
        self.terms = revised.terms.clone();
        self.updated_at = revised.updated_at;
    }

    /// Copies the status and update timestamp of `transitioned`, keeping
    /// this bid's terms.
    pub(crate) fn adopt_status(&mut self, transitioned: &Self) {
        self.status = transitioned.status;
        self.updated_at = transitioned.updated_at;
    }

    /// Marks a pending bid accepted.
    ///
    /// # Errors
    ///
    /// Returns [`BidDomainError::InvalidStatusTransition`] unless the bid is
    /// pending.
    pub fn accept(&mut self, clock: &impl Clock) -> Result<(), BidDomainError> {
        if self.status != BidStatus::Pending {
            return Err(BidDomainError::InvalidStatusTransition {
                bid_id: self.id,
                from: self.status.as_str(),
                to: BidStatus::Accepted.as_str(),
            });
        }
        self.status = BidStatus::Accepted;
        self.updated_at = clock.utc();
        Ok(())
    }
}
