//! Authorization error taxonomy

use thiserror::Error;

use super::referer::RefererDefect;
use crate::domain::DomainError;

/// Why an authorization was refused with [`AuthorizationError::Forbidden`]
///
/// Only logged; callers always see a plain "forbidden".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    HostnameMismatch,
    MissingReferer,
    MalformedReferer(RefererDefect),
    ScopeNotGranted,
    NoMatchingFeature,
}

impl std::fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HostnameMismatch => write!(f, "hostname_mismatch"),
            Self::MissingReferer => write!(f, "missing_referer"),
            Self::MalformedReferer(defect) => write!(f, "malformed_referer:{}", defect),
            Self::ScopeNotGranted => write!(f, "scope_not_granted"),
            Self::NoMatchingFeature => write!(f, "no_matching_feature"),
        }
    }
}

/// Errors returned by inspection, authorization and provisioning
#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("No API key was presented")]
    MissingKey,

    #[error("Unknown API key")]
    UnknownKey,

    #[error("Forbidden")]
    Forbidden(ForbiddenReason),

    #[error("Invalid scopes: {0}")]
    InvalidScopes(String),

    #[error("Quota exceeded, retry after {retry_after_secs} seconds")]
    QuotaExceeded { retry_after_secs: u64 },

    #[error(transparent)]
    Store(#[from] DomainError),
}

impl AuthorizationError {
    pub fn forbidden(reason: ForbiddenReason) -> Self {
        Self::Forbidden(reason)
    }

    /// Stable machine-readable kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingKey => "missing_key",
            Self::UnknownKey => "unknown_key",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidScopes(_) => "invalid_scopes",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::Store(_) => "internal_error",
        }
    }

    /// Retry hint, present only for quota exhaustion
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::QuotaExceeded { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}
