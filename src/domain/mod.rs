//! Domain layer - Core business logic and entities

pub mod authorization;
pub mod error;
pub mod feature;
pub mod key;

pub use authorization::{AuthorizationError, ForbiddenReason, Referer, RefererDefect};
pub use error::DomainError;
pub use feature::{any_feature_matches, Feature, RequestedAction};
pub use key::{
    AuthorizationRecord, HostnameBinding, Key, KeyId, KeyRepository, KeyValidationError, KeyView,
    ScopeValidator, UsageView,
};
