use thiserror::Error;

/// Failures below the authorization taxonomy: key stores and wiring
#[derive(Debug, Error)]
pub enum DomainError {
    /// `create` found the key string already taken
    #[error("Key '{key_prefix}***' already exists")]
    DuplicateKey { key_prefix: String },

    #[error("Key store error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn duplicate_key(key_prefix: impl Into<String>) -> Self {
        Self::DuplicateKey {
            key_prefix: key_prefix.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_shows_only_prefix() {
        let error = DomainError::duplicate_key("abcd");
        assert_eq!(error.to_string(), "Key 'abcd***' already exists");
        assert!(error.is_duplicate_key());
    }

    #[test]
    fn test_storage_error_is_not_duplicate() {
        let error = DomainError::storage("connection refused");
        assert_eq!(error.to_string(), "Key store error: connection refused");
        assert!(!error.is_duplicate_key());
    }
}
