//! Key repository trait

use std::fmt::Debug;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::{AuthorizationRecord, Key, KeyId};
use crate::domain::DomainError;

/// Repository trait for key storage
///
/// Implementations must perform [`KeyRepository::increment_usage_within_quota`] as a
/// single atomic operation against the backing store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyRepository: Send + Sync + Debug {
    /// Get a full key record
    async fn find(&self, key: &KeyId) -> Result<Option<Key>, DomainError>;

    /// Get only the fields an authorization decision reads
    async fn find_for_authorization(
        &self,
        key: &KeyId,
    ) -> Result<Option<AuthorizationRecord>, DomainError> {
        Ok(self.find(key).await?.map(AuthorizationRecord::from))
    }

    /// Create a new key, failing with `DuplicateKey` when the key string is taken
    async fn create(&self, key: Key) -> Result<Key, DomainError>;

    /// Increment usage by one if it is still below `quota`
    ///
    /// Returns the new usage, or `None` when the increment would exceed the quota
    /// or no such key exists. Check and increment happen atomically.
    async fn increment_usage_within_quota(
        &self,
        key: &KeyId,
        quota: u64,
    ) -> Result<Option<u64>, DomainError>;

    /// Check if a key exists
    async fn exists(&self, key: &KeyId) -> Result<bool, DomainError> {
        Ok(self.find(key).await?.is_some())
    }
}
