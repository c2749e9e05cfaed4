//! Route handlers, one module per context.

pub(super) mod bids;
pub(super) mod payments;
pub(super) mod reviews;
pub(super) mod tasks;
pub(super) mod users;
