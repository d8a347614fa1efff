//! Key store selection at startup

use std::sync::Arc;

use tracing::info;

use crate::config::StorageConfig;
use crate::domain::key::KeyRepository;
use crate::domain::DomainError;
use crate::infrastructure::key::{InMemoryKeyRepository, PostgresKeyRepository};

use super::postgres::PostgresConfig;

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Resolve the database URL, falling back to `DATABASE_URL`
fn resolve_database_url(config: &StorageConfig) -> Option<String> {
    config
        .database_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .or_else(|| std::env::var("DATABASE_URL").ok())
}

/// Build the key store named by `config.backend`
///
/// PostgreSQL stores get their table created if missing.
pub async fn create_key_repository(
    config: &StorageConfig,
) -> Result<Arc<dyn KeyRepository>, DomainError> {
    let storage_type = StorageType::from_str(&config.backend).ok_or_else(|| {
        DomainError::configuration(format!("Unknown storage backend '{}'", config.backend))
    })?;

    match storage_type {
        StorageType::InMemory => {
            info!("Using in-memory key store");
            Ok(Arc::new(InMemoryKeyRepository::new()))
        }
        StorageType::Postgres => {
            let url = resolve_database_url(config).ok_or_else(|| {
                DomainError::configuration(
                    "storage.database_url or DATABASE_URL is required for the postgres backend",
                )
            })?;

            let pool = PostgresConfig::new(url)
                .with_max_connections(config.max_connections)
                .connect()
                .await?;

            let repository = PostgresKeyRepository::new(pool, config.table.as_str())?;
            repository.ensure_table().await?;

            info!(table = %config.table, "Using PostgreSQL key store");
            Ok(Arc::new(repository))
        }
    }
}
