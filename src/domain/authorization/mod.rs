//! Authorization domain
//!
//! The referer descriptor a caller submits and the errors an authorization
//! decision can produce.

mod error;
mod referer;

pub use error::{AuthorizationError, ForbiddenReason};
pub use referer::{Referer, RefererDefect};
