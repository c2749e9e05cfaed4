//! Domain model for payment records.

mod error;
mod ids;
mod payment;

pub use error::{ParsePaymentStatusError, PaymentDomainError};
pub use ids::PaymentId;
pub use payment::{PersistedPaymentData, Payment, PaymentStatus};
