//! Authorization engine
//!
//! Answers two questions about a presented key: what the key is (`inspect`) and
//! whether it may perform an action right now (`authorize`). Only a granted
//! authorization writes to the store, through the quota ledger.

use std::sync::Arc;

use tracing::debug;

use crate::config::AuthorizationConfig;
use crate::domain::authorization::{AuthorizationError, ForbiddenReason, Referer};
use crate::domain::feature::any_feature_matches;
use crate::domain::key::{KeyId, KeyRepository, KeyView, UsageView};
use crate::infrastructure::observability::record_authorization_decision;
use crate::infrastructure::quota::QuotaLedger;

#[derive(Debug, Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn KeyRepository>,
    ledger: QuotaLedger,
    enforce_scopes: bool,
}

impl AuthorizationService {
    pub fn new(repository: Arc<dyn KeyRepository>, config: &AuthorizationConfig) -> Self {
        let ledger =
            QuotaLedger::new(repository.clone()).with_retry_after(config.retry_after_secs);

        Self {
            repository,
            ledger,
            enforce_scopes: config.enforce_scopes,
        }
    }

    pub fn enforces_scopes(&self) -> bool {
        self.enforce_scopes
    }

    /// Describe a key to a caller on `hostname`
    ///
    /// Read-only: usage is reported, never consumed.
    pub async fn inspect(
        &self,
        presented_key: &str,
        hostname: &str,
    ) -> Result<KeyView, AuthorizationError> {
        let outcome = self.evaluate_inspect(presented_key, hostname).await;
        record_outcome("inspect", &outcome);
        outcome
    }

    /// Decide whether `presented_key` may perform the action in `referer`
    ///
    /// On success one unit of quota is consumed and the new usage returned.
    pub async fn authorize(
        &self,
        presented_key: &str,
        hostname: &str,
        referer: Option<&Referer>,
    ) -> Result<UsageView, AuthorizationError> {
        let outcome = self.evaluate_authorize(presented_key, hostname, referer).await;
        record_outcome("authorize", &outcome);
        outcome
    }

    async fn evaluate_inspect(
        &self,
        presented_key: &str,
        hostname: &str,
    ) -> Result<KeyView, AuthorizationError> {
        let key_id = parse_presented_key(presented_key)?;

        let key = self
            .repository
            .find(&key_id)
            .await?
            .ok_or(AuthorizationError::UnknownKey)?;

        if !key.hostname().permits(hostname) {
            return Err(deny(&key_id, ForbiddenReason::HostnameMismatch));
        }

        Ok(KeyView::from(key))
    }

    async fn evaluate_authorize(
        &self,
        presented_key: &str,
        hostname: &str,
        referer: Option<&Referer>,
    ) -> Result<UsageView, AuthorizationError> {
        let key_id = parse_presented_key(presented_key)?;

        let record = self
            .repository
            .find_for_authorization(&key_id)
            .await?
            .ok_or(AuthorizationError::UnknownKey)?;

        if !record.hostname.permits(hostname) {
            return Err(deny(&key_id, ForbiddenReason::HostnameMismatch));
        }

        let referer = referer.ok_or_else(|| deny(&key_id, ForbiddenReason::MissingReferer))?;

        referer
            .validate(self.enforce_scopes)
            .map_err(|defect| deny(&key_id, ForbiddenReason::MalformedReferer(defect)))?;

        if self.enforce_scopes && !record.scopes.contains(&referer.scope) {
            return Err(deny(&key_id, ForbiddenReason::ScopeNotGranted));
        }

        if !any_feature_matches(&record.features, &referer.action()) {
            return Err(deny(&key_id, ForbiddenReason::NoMatchingFeature));
        }

        let usage = self
            .ledger
            .try_consume(&key_id, record.usage, record.quota)
            .await?;

        debug!(key_prefix = %key_id.log_prefix(), usage, quota = record.quota, "Authorized");

        Ok(UsageView {
            usage,
            quota: record.quota,
        })
    }
}

/// Empty keys are missing; keys that could never have been issued are unknown
fn parse_presented_key(presented_key: &str) -> Result<KeyId, AuthorizationError> {
    if presented_key.is_empty() {
        return Err(AuthorizationError::MissingKey);
    }

    KeyId::new(presented_key).map_err(|_| AuthorizationError::UnknownKey)
}

fn deny(key_id: &KeyId, reason: ForbiddenReason) -> AuthorizationError {
    debug!(key_prefix = %key_id.log_prefix(), reason = %reason, "Authorization denied");
    AuthorizationError::forbidden(reason)
}

fn record_outcome<T>(operation: &'static str, outcome: &Result<T, AuthorizationError>) {
    let label = match outcome {
        Ok(_) => "granted",
        Err(e) => e.code(),
    };

    record_authorization_decision(operation, label);
}
