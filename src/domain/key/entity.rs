//! Key entity and related types

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_key, KeyValidationError};
use crate::domain::feature::Feature;

/// Wildcard hostname value accepted from any caller host
pub const WILDCARD_HOSTNAME: &str = "*";

/// Key identifier - the opaque key string presented by callers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyId(String);

impl KeyId {
    /// Create a new KeyId after validation
    pub fn new(key: impl Into<String>) -> Result<Self, KeyValidationError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self(key))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix that is safe to log
    pub fn log_prefix(&self) -> String {
        self.0.chars().take(4).collect()
    }
}

impl TryFrom<String> for KeyId {
    type Error = KeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<KeyId> for String {
    fn from(id: KeyId) -> Self {
        id.0
    }
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host binding of a key
///
/// Serialized as the plain hostname string, with `*` standing for [`HostnameBinding::Any`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HostnameBinding {
    /// Usable from any caller host
    #[default]
    Any,
    /// Bound to a single hostname
    Host(String),
}

impl HostnameBinding {
    /// Parse a stored hostname value, lowercasing bound hosts
    pub fn parse(value: impl Into<String>) -> Result<Self, KeyValidationError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(KeyValidationError::EmptyHostname);
        }

        if trimmed == WILDCARD_HOSTNAME {
            Ok(Self::Any)
        } else {
            Ok(Self::Host(trimmed.to_ascii_lowercase()))
        }
    }

    /// Check whether a request coming from `hostname` may use the key
    ///
    /// Hostnames compare case-insensitively.
    pub fn permits(&self, hostname: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Host(bound) => bound.eq_ignore_ascii_case(hostname.trim()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => WILDCARD_HOSTNAME,
            Self::Host(host) => host,
        }
    }
}

impl TryFrom<String> for HostnameBinding {
    type Error = KeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HostnameBinding> for String {
    fn from(binding: HostnameBinding) -> Self {
        binding.as_str().to_string()
    }
}

impl std::fmt::Display for HostnameBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Key {
    /// The key string, unique across all records
    key: KeyId,
    /// Host the key is bound to
    #[serde(default)]
    hostname: HostnameBinding,
    /// Usage ceiling for the accounting period
    #[serde(default)]
    quota: u64,
    /// Consumed quota
    #[serde(default)]
    usage: u64,
    /// Scope tokens that may be presented when authorizing
    #[serde(default)]
    scopes: BTreeSet<String>,
    /// Actions the key may invoke
    #[serde(default)]
    features: Vec<Feature>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Key {
    /// Create a new key bound to any host, with zero quota and no features
    pub fn new(key: KeyId) -> Self {
        let now = Utc::now();

        Self {
            key,
            hostname: HostnameBinding::Any,
            quota: 0,
            usage: 0,
            scopes: BTreeSet::new(),
            features: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_hostname(mut self, hostname: HostnameBinding) -> Self {
        self.hostname = hostname;
        self
    }

    pub fn with_quota(mut self, quota: u64) -> Self {
        self.quota = quota;
        self
    }

    pub fn with_usage(mut self, usage: u64) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    /// Restore persisted timestamps
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // Getters

    pub fn key(&self) -> &KeyId {
        &self.key
    }

    pub fn hostname(&self) -> &HostnameBinding {
        &self.hostname
    }

    pub fn quota(&self) -> u64 {
        self.quota
    }

    pub fn usage(&self) -> u64 {
        self.usage
    }

    pub fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Consume one unit of quota if usage is still below `ceiling`
    ///
    /// Returns the new usage, or `None` when the ceiling is reached.
    pub fn consume_quota(&mut self, ceiling: u64) -> Option<u64> {
        if self.usage >= ceiling {
            return None;
        }

        self.usage += 1;
        self.updated_at = Utc::now();
        Some(self.usage)
    }
}

/// The fields an authorization decision needs
///
/// This is the projection `usage, quota, hostname, features, scopes` of a [`Key`].
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationRecord {
    pub hostname: HostnameBinding,
    pub quota: u64,
    pub usage: u64,
    pub scopes: BTreeSet<String>,
    pub features: Vec<Feature>,
}

impl From<Key> for AuthorizationRecord {
    fn from(key: Key) -> Self {
        Self {
            hostname: key.hostname,
            quota: key.quota,
            usage: key.usage,
            scopes: key.scopes,
            features: key.features,
        }
    }
}

/// Public view of a key: every field except internal timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyView {
    pub key: String,
    pub hostname: String,
    pub quota: u64,
    pub usage: u64,
    pub scopes: Vec<String>,
    pub features: Vec<Feature>,
}

impl From<&Key> for KeyView {
    fn from(key: &Key) -> Self {
        Self {
            key: key.key.as_str().to_string(),
            hostname: key.hostname.as_str().to_string(),
            quota: key.quota,
            usage: key.usage,
            scopes: key.scopes.iter().cloned().collect(),
            features: key.features.clone(),
        }
    }
}

impl From<Key> for KeyView {
    fn from(key: Key) -> Self {
        Self::from(&key)
    }
}

/// Usage and quota after a successful authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageView {
    pub usage: u64,
    pub quota: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_key(id: &str) -> Key {
        Key::new(KeyId::new(id).unwrap())
    }

    #[test]
    fn test_key_id_valid() {
        let id = KeyId::new("Test1").unwrap();
        assert_eq!(id.as_str(), "Test1");
        assert_eq!(id.to_string(), "Test1");
    }

    #[test]
    fn test_key_id_invalid() {
        assert!(KeyId::new("").is_err());
        assert!(KeyId::new("with space").is_err());
    }

    #[test]
    fn test_key_id_log_prefix() {
        let id = KeyId::new("abcdefgh").unwrap();
        assert_eq!(id.log_prefix(), "abcd");
    }

    #[test]
    fn test_hostname_binding_parse() {
        assert_eq!(HostnameBinding::parse("*").unwrap(), HostnameBinding::Any);
        assert_eq!(
            HostnameBinding::parse("example.com").unwrap(),
            HostnameBinding::Host("example.com".to_string())
        );
        assert!(HostnameBinding::parse("  ").is_err());
        assert_eq!(
            HostnameBinding::parse(" Example.COM ").unwrap(),
            HostnameBinding::Host("example.com".to_string())
        );
    }

    #[test]
    fn test_wildcard_permits_any_host() {
        let binding = HostnameBinding::Any;

        assert!(binding.permits("example.com"));
        assert!(binding.permits("127.0.0.1"));
        assert!(binding.permits(""));
    }

    #[test]
    fn test_bound_host_is_case_insensitive() {
        let binding = HostnameBinding::Host("Example.com".to_string());

        assert!(binding.permits("example.COM"));
        assert!(!binding.permits("other.com"));
        assert!(!binding.permits("sub.example.com"));
    }

    #[test]
    fn test_hostname_binding_serde() {
        let json = serde_json::to_string(&HostnameBinding::Any).unwrap();
        assert_eq!(json, "\"*\"");

        let parsed: HostnameBinding = serde_json::from_str("\"example.com\"").unwrap();
        assert_eq!(parsed, HostnameBinding::Host("example.com".to_string()));
    }

    #[test]
    fn test_key_defaults() {
        let key = create_test_key("Test1");

        assert_eq!(key.hostname(), &HostnameBinding::Any);
        assert_eq!(key.quota(), 0);
        assert_eq!(key.usage(), 0);
        assert!(key.scopes().is_empty());
        assert!(key.features().is_empty());
    }

    #[test]
    fn test_consume_quota_stops_at_ceiling() {
        let mut key = create_test_key("Test1").with_quota(2);

        assert_eq!(key.consume_quota(key.quota()), Some(1));
        assert_eq!(key.consume_quota(key.quota()), Some(2));
        assert_eq!(key.consume_quota(key.quota()), None);
        assert_eq!(key.usage(), 2);
    }

    #[test]
    fn test_scopes_are_deduplicated() {
        let key = create_test_key("Test1").with_scopes(["123456", "123456", "654321"]);
        assert_eq!(key.scopes().len(), 2);
    }

    #[test]
    fn test_key_view_hides_timestamps() {
        let key = create_test_key("Test1")
            .with_hostname(HostnameBinding::parse("127.0.0.1").unwrap())
            .with_quota(1)
            .with_features(vec![Feature::new("GET", "/something")]);

        let json = serde_json::to_value(KeyView::from(&key)).unwrap();

        assert_eq!(json["key"], "Test1");
        assert_eq!(json["hostname"], "127.0.0.1");
        assert_eq!(json["quota"], 1);
        assert_eq!(json["usage"], 0);
        assert_eq!(json["features"][0]["method"], "GET");
        assert!(json.get("created_at").is_none());
        assert!(json.get("updated_at").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_authorization_record_projection() {
        let key = create_test_key("Test5")
            .with_quota(1)
            .with_scopes(["123456"])
            .with_features(vec![Feature::new("GET", "/authorization")]);

        let record = AuthorizationRecord::from(key);

        assert_eq!(record.quota, 1);
        assert_eq!(record.usage, 0);
        assert!(record.scopes.contains("123456"));
        assert_eq!(record.features.len(), 1);
    }

    #[test]
    fn test_key_deserializes_with_defaults() {
        let json = serde_json::json!({
            "key": "Test3",
            "hostname": "example.com",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        });

        let key: Key = serde_json::from_value(json).unwrap();

        assert_eq!(key.quota(), 0);
        assert_eq!(key.usage(), 0);
        assert!(!key.hostname().permits("other.com"));
    }
}
