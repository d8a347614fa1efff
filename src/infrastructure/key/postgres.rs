//! PostgreSQL key repository
//!
//! Keys live in a single table with one column per field. Scopes and features
//! are stored as JSONB. Usage is incremented with a single conditional `UPDATE`
//! so concurrent authorizations can never push usage past quota.

use std::collections::BTreeSet;
use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use tracing::debug;

use crate::domain::feature::Feature;
use crate::domain::key::{AuthorizationRecord, HostnameBinding, Key, KeyId, KeyRepository};
use crate::domain::DomainError;

static TABLE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]{0,62}$").unwrap());

/// SQL statements bound to one table name
#[derive(Debug, Clone, PartialEq, Eq)]
struct KeyQueries {
    create_table: String,
    find: String,
    find_for_authorization: String,
    insert: String,
    increment_within_quota: String,
}

impl KeyQueries {
    fn new(table: &str) -> Self {
        Self {
            create_table: format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    key TEXT PRIMARY KEY,
                    hostname TEXT NOT NULL DEFAULT '*',
                    quota BIGINT NOT NULL DEFAULT 0 CHECK (quota >= 0),
                    usage BIGINT NOT NULL DEFAULT 0 CHECK (usage >= 0),
                    scopes JSONB NOT NULL DEFAULT '[]'::jsonb,
                    features JSONB NOT NULL DEFAULT '[]'::jsonb,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#
            ),
            find: format!(
                "SELECT key, hostname, quota, usage, scopes, features, created_at, updated_at \
                 FROM {table} WHERE key = $1"
            ),
            find_for_authorization: format!(
                "SELECT hostname, quota, usage, scopes, features FROM {table} WHERE key = $1"
            ),
            insert: format!(
                "INSERT INTO {table} \
                 (key, hostname, quota, usage, scopes, features, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 ON CONFLICT (key) DO NOTHING RETURNING key"
            ),
            increment_within_quota: format!(
                "UPDATE {table} SET usage = usage + 1, updated_at = NOW() \
                 WHERE key = $1 AND usage < $2 RETURNING usage"
            ),
        }
    }
}

/// PostgreSQL implementation of KeyRepository
pub struct PostgresKeyRepository {
    pool: PgPool,
    table_name: String,
    queries: KeyQueries,
}

impl Debug for PostgresKeyRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresKeyRepository")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PostgresKeyRepository {
    /// Creates a repository over `table_name`
    ///
    /// The table name is interpolated into SQL, so it must be a plain identifier.
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Result<Self, DomainError> {
        let table_name = table_name.into();

        if !TABLE_NAME_PATTERN.is_match(&table_name) {
            return Err(DomainError::configuration(format!(
                "Invalid table name '{}'",
                table_name
            )));
        }

        let queries = KeyQueries::new(&table_name);

        Ok(Self {
            pool,
            table_name,
            queries,
        })
    }

    /// Ensures the key table exists
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        sqlx::query(&self.queries.create_table)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        debug!(table = %self.table_name, "Key table ready");
        Ok(())
    }
}

fn to_u64(value: i64, column: &str) -> Result<u64, DomainError> {
    u64::try_from(value)
        .map_err(|_| DomainError::storage(format!("Negative value in column '{}'", column)))
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn storage_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("{}: {}", context, e))
}

fn read_authorization_record(row: &PgRow) -> Result<AuthorizationRecord, DomainError> {
    let hostname: String = row
        .try_get("hostname")
        .map_err(|e| storage_error("Failed to read hostname", e))?;
    let quota: i64 = row
        .try_get("quota")
        .map_err(|e| storage_error("Failed to read quota", e))?;
    let usage: i64 = row
        .try_get("usage")
        .map_err(|e| storage_error("Failed to read usage", e))?;
    let Json(scopes): Json<BTreeSet<String>> = row
        .try_get("scopes")
        .map_err(|e| storage_error("Failed to read scopes", e))?;
    let Json(features): Json<Vec<Feature>> = row
        .try_get("features")
        .map_err(|e| storage_error("Failed to read features", e))?;

    Ok(AuthorizationRecord {
        hostname: HostnameBinding::parse(hostname)
            .map_err(|e| DomainError::storage(format!("Invalid stored hostname: {}", e)))?,
        quota: to_u64(quota, "quota")?,
        usage: to_u64(usage, "usage")?,
        scopes,
        features,
    })
}

fn read_key(row: &PgRow) -> Result<Key, DomainError> {
    let key: String = row
        .try_get("key")
        .map_err(|e| storage_error("Failed to read key", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| storage_error("Failed to read created_at", e))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| storage_error("Failed to read updated_at", e))?;

    let record = read_authorization_record(row)?;
    let key_id = KeyId::new(key)
        .map_err(|e| DomainError::storage(format!("Invalid stored key: {}", e)))?;

    Ok(Key::new(key_id)
        .with_hostname(record.hostname)
        .with_quota(record.quota)
        .with_usage(record.usage)
        .with_scopes(record.scopes)
        .with_features(record.features)
        .with_timestamps(created_at, updated_at))
}

#[async_trait]
impl KeyRepository for PostgresKeyRepository {
    async fn find(&self, key: &KeyId) -> Result<Option<Key>, DomainError> {
        let row = sqlx::query(&self.queries.find)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to get key", e))?;

        row.as_ref().map(read_key).transpose()
    }

    async fn find_for_authorization(
        &self,
        key: &KeyId,
    ) -> Result<Option<AuthorizationRecord>, DomainError> {
        let row = sqlx::query(&self.queries.find_for_authorization)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to get key", e))?;

        row.as_ref().map(read_authorization_record).transpose()
    }

    async fn create(&self, key: Key) -> Result<Key, DomainError> {
        let scopes: Vec<&String> = key.scopes().iter().collect();

        let inserted = sqlx::query(&self.queries.insert)
            .bind(key.key().as_str())
            .bind(key.hostname().as_str())
            .bind(to_i64(key.quota()))
            .bind(to_i64(key.usage()))
            .bind(Json(scopes))
            .bind(Json(key.features()))
            .bind(key.created_at())
            .bind(key.updated_at())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to create key", e))?;

        if inserted.is_none() {
            return Err(DomainError::duplicate_key(key.key().log_prefix()));
        }

        Ok(key)
    }

    async fn increment_usage_within_quota(
        &self,
        key: &KeyId,
        quota: u64,
    ) -> Result<Option<u64>, DomainError> {
        let row = sqlx::query(&self.queries.increment_within_quota)
            .bind(key.as_str())
            .bind(to_i64(quota))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to increment usage", e))?;

        match row {
            Some(row) => {
                let usage: i64 = row
                    .try_get("usage")
                    .map_err(|e| storage_error("Failed to read usage", e))?;
                Ok(Some(to_u64(usage, "usage")?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_is_single_conditional_statement() {
        let queries = KeyQueries::new("authentication");

        assert!(queries.increment_within_quota.starts_with("UPDATE authentication"));
        assert!(queries.increment_within_quota.contains("usage = usage + 1"));
        assert!(queries.increment_within_quota.contains("WHERE key = $1 AND usage < $2"));
        assert!(queries.increment_within_quota.ends_with("RETURNING usage"));
    }

    #[test]
    fn test_authorization_projection_columns() {
        let queries = KeyQueries::new("keys");

        assert_eq!(
            queries.find_for_authorization,
            "SELECT hostname, quota, usage, scopes, features FROM keys WHERE key = $1"
        );
    }

    #[test]
    fn test_insert_does_not_overwrite() {
        let queries = KeyQueries::new("keys");
        assert!(queries.insert.contains("ON CONFLICT (key) DO NOTHING"));
    }

    #[test]
    fn test_table_name_pattern() {
        assert!(TABLE_NAME_PATTERN.is_match("authentication"));
        assert!(TABLE_NAME_PATTERN.is_match("api_keys_v2"));
        assert!(!TABLE_NAME_PATTERN.is_match("keys; DROP TABLE users"));
        assert!(!TABLE_NAME_PATTERN.is_match("1keys"));
        assert!(!TABLE_NAME_PATTERN.is_match(""));
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(to_u64(5, "quota").unwrap(), 5);
        assert!(to_u64(-1, "usage").is_err());
        assert_eq!(to_i64(u64::MAX), i64::MAX);
    }
}
