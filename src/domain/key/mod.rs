//! Key domain
//!
//! Domain types and traits for API keys: the persisted record, its hostname
//! binding, scope validation and the storage contract.

mod entity;
mod repository;
mod validation;

pub use entity::{
    AuthorizationRecord, HostnameBinding, Key, KeyId, KeyView, UsageView, WILDCARD_HOSTNAME,
};
#[cfg(test)]
pub use repository::MockKeyRepository;
pub use repository::KeyRepository;
pub use validation::{
    validate_key, KeyValidationError, ScopeValidator, DEFAULT_SCOPE_LENGTH, MAX_KEY_LENGTH,
};
