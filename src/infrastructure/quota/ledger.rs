//! Quota ledger
//!
//! Turns one successful authorization into one unit of consumed quota. The
//! snapshot check rejects exhausted keys without touching the store. The store's
//! conditional increment is the real guard against concurrent consumers.

use std::sync::Arc;

use tracing::debug;

use crate::domain::authorization::AuthorizationError;
use crate::domain::key::{KeyId, KeyRepository};
use crate::infrastructure::observability::record_quota_consumed;

/// Retry hint advertised when quota is exhausted
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct QuotaLedger {
    repository: Arc<dyn KeyRepository>,
    retry_after_secs: u64,
}

impl QuotaLedger {
    pub fn new(repository: Arc<dyn KeyRepository>) -> Self {
        Self {
            repository,
            retry_after_secs: DEFAULT_RETRY_AFTER_SECS,
        }
    }

    pub fn with_retry_after(mut self, retry_after_secs: u64) -> Self {
        self.retry_after_secs = retry_after_secs;
        self
    }

    /// Consume one unit of `key`'s quota
    ///
    /// Returns `current_usage + 1` on success. Nothing is written when quota is
    /// already exhausted.
    pub async fn try_consume(
        &self,
        key: &KeyId,
        current_usage: u64,
        quota: u64,
    ) -> Result<u64, AuthorizationError> {
        if current_usage >= quota {
            debug!(key_prefix = %key.log_prefix(), usage = current_usage, quota, "Quota exhausted");
            return Err(self.exceeded());
        }

        match self.repository.increment_usage_within_quota(key, quota).await? {
            Some(_) => {
                record_quota_consumed();
                Ok(current_usage + 1)
            }
            None => {
                debug!(
                    key_prefix = %key.log_prefix(),
                    quota,
                    "Quota consumed concurrently before increment"
                );
                Err(self.exceeded())
            }
        }
    }

    fn exceeded(&self) -> AuthorizationError {
        AuthorizationError::QuotaExceeded {
            retry_after_secs: self.retry_after_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::key::{Key, MockKeyRepository};
    use crate::domain::DomainError;
    use crate::infrastructure::key::InMemoryKeyRepository;
    use mockall::predicate::eq;

    fn key_id() -> KeyId {
        KeyId::new("Test1").unwrap()
    }

    #[tokio::test]
    async fn test_exhausted_quota_never_reaches_store() {
        let mut mock = MockKeyRepository::new();
        mock.expect_increment_usage_within_quota().times(0);
        let ledger = QuotaLedger::new(Arc::new(mock));

        let result = ledger.try_consume(&key_id(), 5, 5).await;

        assert!(matches!(
            result,
            Err(AuthorizationError::QuotaExceeded { retry_after_secs: 10 })
        ));
    }

    #[tokio::test]
    async fn test_zero_quota_is_exhausted() {
        let mut mock = MockKeyRepository::new();
        mock.expect_increment_usage_within_quota().times(0);
        let ledger = QuotaLedger::new(Arc::new(mock));

        assert!(ledger.try_consume(&key_id(), 0, 0).await.is_err());
    }

    #[tokio::test]
    async fn test_consume_returns_incremented_usage() {
        let mut mock = MockKeyRepository::new();
        mock.expect_increment_usage_within_quota()
            .with(eq(key_id()), eq(3))
            .times(1)
            .returning(|_, _| Ok(Some(2)));
        let ledger = QuotaLedger::new(Arc::new(mock));

        assert_eq!(ledger.try_consume(&key_id(), 1, 3).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_lost_race_is_quota_exceeded() {
        let mut mock = MockKeyRepository::new();
        mock.expect_increment_usage_within_quota()
            .times(1)
            .returning(|_, _| Ok(None));
        let ledger = QuotaLedger::new(Arc::new(mock)).with_retry_after(30);

        let err = ledger.try_consume(&key_id(), 0, 1).await.unwrap_err();

        assert_eq!(err.retry_after_secs(), Some(30));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut mock = MockKeyRepository::new();
        mock.expect_increment_usage_within_quota()
            .times(1)
            .returning(|_, _| Err(DomainError::storage("timeout")));
        let ledger = QuotaLedger::new(Arc::new(mock));

        let result = ledger.try_consume(&key_id(), 0, 1).await;

        assert!(matches!(result, Err(AuthorizationError::Store(_))));
    }

    #[tokio::test]
    async fn test_consume_persists_usage() {
        let repo = Arc::new(InMemoryKeyRepository::with_keys(vec![
            Key::new(key_id()).with_quota(2),
        ]));
        let ledger = QuotaLedger::new(repo.clone());

        assert_eq!(ledger.try_consume(&key_id(), 0, 2).await.unwrap(), 1);
        assert_eq!(repo.find(&key_id()).await.unwrap().unwrap().usage(), 1);
    }
}
