//! In-memory key repository implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::key::{Key, KeyId, KeyRepository};
use crate::domain::DomainError;

/// In-memory implementation of KeyRepository
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryKeyRepository {
    keys: Arc<RwLock<HashMap<String, Key>>>,
}

impl InMemoryKeyRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial keys
    pub fn with_keys(keys: Vec<Key>) -> Self {
        let map = keys
            .into_iter()
            .map(|k| (k.key().as_str().to_string(), k))
            .collect();

        Self {
            keys: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl KeyRepository for InMemoryKeyRepository {
    async fn find(&self, key: &KeyId) -> Result<Option<Key>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.get(key.as_str()).cloned())
    }

    async fn create(&self, key: Key) -> Result<Key, DomainError> {
        let mut keys = self.keys.write().await;
        let id = key.key().as_str().to_string();

        if keys.contains_key(&id) {
            return Err(DomainError::duplicate_key(key.key().log_prefix()));
        }

        keys.insert(id, key.clone());
        Ok(key)
    }

    async fn increment_usage_within_quota(
        &self,
        key: &KeyId,
        quota: u64,
    ) -> Result<Option<u64>, DomainError> {
        let mut keys = self.keys.write().await;

        Ok(keys
            .get_mut(key.as_str())
            .and_then(|record| record.consume_quota(quota)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature::Feature;

    fn create_test_key(id: &str, quota: u64) -> Key {
        Key::new(KeyId::new(id).unwrap())
            .with_quota(quota)
            .with_features(vec![Feature::new("GET", "/x")])
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryKeyRepository::new();
        let key = create_test_key("Test1", 1);

        repo.create(key.clone()).await.unwrap();

        let found = repo.find(key.key()).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().quota(), 1);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repo = InMemoryKeyRepository::new();
        let found = repo.find(&KeyId::new("nope").unwrap()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_key() {
        let repo = InMemoryKeyRepository::new();

        repo.create(create_test_key("Test1", 1)).await.unwrap();
        let result = repo.create(create_test_key("Test1", 5)).await;

        assert!(result.unwrap_err().is_duplicate_key());
    }

    #[tokio::test]
    async fn test_find_for_authorization_projects_fields() {
        let repo = InMemoryKeyRepository::with_keys(vec![create_test_key("Test1", 3)]);

        let record = repo
            .find_for_authorization(&KeyId::new("Test1").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.quota, 3);
        assert_eq!(record.usage, 0);
        assert_eq!(record.features, vec![Feature::new("GET", "/x")]);
    }

    #[tokio::test]
    async fn test_increment_stops_at_quota() {
        let repo = InMemoryKeyRepository::with_keys(vec![create_test_key("Test1", 2)]);
        let id = KeyId::new("Test1").unwrap();

        assert_eq!(repo.increment_usage_within_quota(&id, 2).await.unwrap(), Some(1));
        assert_eq!(repo.increment_usage_within_quota(&id, 2).await.unwrap(), Some(2));
        assert_eq!(repo.increment_usage_within_quota(&id, 2).await.unwrap(), None);

        assert_eq!(repo.find(&id).await.unwrap().unwrap().usage(), 2);
    }

    #[tokio::test]
    async fn test_increment_honours_caller_ceiling() {
        let repo = InMemoryKeyRepository::with_keys(vec![create_test_key("Test1", 5)]);
        let id = KeyId::new("Test1").unwrap();

        assert_eq!(repo.increment_usage_within_quota(&id, 0).await.unwrap(), None);
        assert_eq!(repo.find(&id).await.unwrap().unwrap().usage(), 0);
    }

    #[tokio::test]
    async fn test_increment_unknown_key() {
        let repo = InMemoryKeyRepository::new();
        let id = KeyId::new("ghost").unwrap();

        assert_eq!(repo.increment_usage_within_quota(&id, 10).await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_never_overshoot() {
        let repo = Arc::new(InMemoryKeyRepository::with_keys(vec![create_test_key(
            "Test1", 25,
        )]));
        let id = KeyId::new("Test1").unwrap();

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let repo = repo.clone();
                let id = id.clone();
                tokio::spawn(async move { repo.increment_usage_within_quota(&id, 25).await })
            })
            .collect();

        let mut succeeded = 0;

        for handle in handles {
            if handle.await.unwrap().unwrap().is_some() {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 25);
        assert_eq!(repo.find(&id).await.unwrap().unwrap().usage(), 25);
    }
}
