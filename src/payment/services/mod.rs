//! Application services for the payment ledger.

mod ledger;

pub use ledger::{
    PaymentLedgerError, PaymentLedgerResult, PaymentLedgerService, PaymentRequest,
    PaymentSettlementRequest,
};
