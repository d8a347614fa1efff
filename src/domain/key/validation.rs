//! Key and scope validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum length accepted for a presented key
pub const MAX_KEY_LENGTH: usize = 128;

/// Default length of a scope token
pub const DEFAULT_SCOPE_LENGTH: usize = 6;

/// Presented keys are opaque, but never contain whitespace or path separators
static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s/]+$").unwrap());

static DEFAULT_SCOPE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{6}$").unwrap());

/// Errors that can occur while validating keys and scopes
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyValidationError {
    #[error("Key cannot be empty")]
    EmptyKey,

    #[error("Key exceeds maximum length of {0} characters")]
    KeyTooLong(usize),

    #[error("Key contains whitespace or '/'")]
    InvalidKeyFormat,

    #[error("At least one scope is required")]
    NoScopes,

    #[error("Scope '{0}' is not a valid scope token")]
    InvalidScope(String),

    #[error("Hostname cannot be empty")]
    EmptyHostname,
}

/// Validate a presented key string
pub fn validate_key(key: &str) -> Result<(), KeyValidationError> {
    if key.is_empty() {
        return Err(KeyValidationError::EmptyKey);
    }

    if key.len() > MAX_KEY_LENGTH {
        return Err(KeyValidationError::KeyTooLong(MAX_KEY_LENGTH));
    }

    if !KEY_PATTERN.is_match(key) {
        return Err(KeyValidationError::InvalidKeyFormat);
    }

    Ok(())
}

/// Validates scope tokens handed to key provisioning
///
/// A scope is a fixed-length alphanumeric token.
#[derive(Debug, Clone)]
pub struct ScopeValidator {
    pattern: Regex,
}

impl ScopeValidator {
    /// Create a validator accepting alphanumeric tokens of exactly `length` characters
    pub fn new(length: usize) -> Self {
        let pattern = Regex::new(&format!("^[A-Za-z0-9]{{{}}}$", length.max(1)))
            .unwrap_or_else(|_| DEFAULT_SCOPE_PATTERN.clone());

        Self { pattern }
    }

    /// Check a single scope token
    pub fn is_valid(&self, scope: &str) -> bool {
        self.pattern.is_match(scope)
    }

    /// Validate a full scope list
    pub fn validate<S: AsRef<str>>(&self, scopes: &[S]) -> Result<(), KeyValidationError> {
        if scopes.is_empty() {
            return Err(KeyValidationError::NoScopes);
        }

        for scope in scopes {
            if !self.is_valid(scope.as_ref()) {
                return Err(KeyValidationError::InvalidScope(scope.as_ref().to_string()));
            }
        }

        Ok(())
    }
}

impl Default for ScopeValidator {
    fn default() -> Self {
        Self::new(DEFAULT_SCOPE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(validate_key("Test1").is_ok());
        assert!(validate_key("aB3dE5gH7jK9mN1p").is_ok());
        assert!(validate_key("key-with_symbols.ok").is_ok());
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(validate_key(""), Err(KeyValidationError::EmptyKey));
    }

    #[test]
    fn test_too_long_key() {
        let long_key = "k".repeat(MAX_KEY_LENGTH + 1);
        assert_eq!(
            validate_key(&long_key),
            Err(KeyValidationError::KeyTooLong(MAX_KEY_LENGTH))
        );
    }

    #[test]
    fn test_key_with_separator() {
        assert_eq!(validate_key("a/b"), Err(KeyValidationError::InvalidKeyFormat));
        assert_eq!(validate_key("a b"), Err(KeyValidationError::InvalidKeyFormat));
    }

    #[test]
    fn test_scope_validator_accepts_six_char_tokens() {
        let validator = ScopeValidator::default();

        assert!(validator.is_valid("123456"));
        assert!(validator.is_valid("abC123"));
        assert!(!validator.is_valid("invalid"));
        assert!(!validator.is_valid("12345"));
        assert!(!validator.is_valid("12 456"));
    }

    #[test]
    fn test_scope_list_validation() {
        let validator = ScopeValidator::default();

        assert!(validator.validate(&["123456", "654321"]).is_ok());
        assert_eq!(
            validator.validate::<&str>(&[]),
            Err(KeyValidationError::NoScopes)
        );
        assert_eq!(
            validator.validate(&["123456", "invalid"]),
            Err(KeyValidationError::InvalidScope("invalid".to_string()))
        );
    }

    #[test]
    fn test_custom_scope_length() {
        let validator = ScopeValidator::new(4);

        assert!(validator.is_valid("abcd"));
        assert!(!validator.is_valid("123456"));
    }
}
