//! Application services for the bid ledger.

mod ledger;

pub use ledger::{
    BidAcceptance, BidLedgerError, BidLedgerResult, BidLedgerService, BidTermsRequest,
};
