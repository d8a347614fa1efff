//! HTTP request and error types

pub mod authorization;
pub mod error;
pub mod json;

pub use authorization::{AuthorizeRequest, ProvisionRequest};
pub use error::{ApiError, ApiErrorResponse};
pub use json::LenientJson;
