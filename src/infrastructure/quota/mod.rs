//! Quota accounting

mod ledger;

pub use ledger::{QuotaLedger, DEFAULT_RETRY_AFTER_SECS};
