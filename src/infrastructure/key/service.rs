//! Key provisioning service
//!
//! Creates new keys with a random key string, the configured defaults and the
//! default feature set.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ProvisioningConfig;
use crate::domain::authorization::AuthorizationError;
use crate::domain::key::{HostnameBinding, Key, KeyId, KeyRepository, ScopeValidator};
use crate::domain::DomainError;

use super::defaults::default_features;
use super::generator::KeyGenerator;

/// Number of fresh keys tried before giving up on collisions
const MAX_GENERATION_ATTEMPTS: usize = 3;

/// Service provisioning new keys
#[derive(Debug)]
pub struct KeyProvisioningService {
    repository: Arc<dyn KeyRepository>,
    generator: KeyGenerator,
    validator: ScopeValidator,
    hostname: HostnameBinding,
    quota: u64,
}

impl KeyProvisioningService {
    pub fn new(repository: Arc<dyn KeyRepository>, config: &ProvisioningConfig) -> Self {
        let hostname = HostnameBinding::parse(config.default_hostname.as_str()).unwrap_or_else(|e| {
            warn!("Invalid default hostname '{}': {}, using '*'", config.default_hostname, e);
            HostnameBinding::Any
        });

        Self {
            repository,
            generator: KeyGenerator::new(config.key_length),
            validator: ScopeValidator::new(config.scope_length),
            hostname,
            quota: config.default_quota,
        }
    }

    /// Provision a key granting `scopes`
    ///
    /// `None` and an empty list are both rejected.
    pub async fn provision(&self, scopes: Option<Vec<String>>) -> Result<Key, AuthorizationError> {
        let scopes = scopes.unwrap_or_default();

        self.validator
            .validate(scopes.as_slice())
            .map_err(|e| AuthorizationError::InvalidScopes(e.to_string()))?;

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let key_id = KeyId::new(self.generator.generate())
                .map_err(|e| DomainError::internal(format!("Generated an invalid key: {}", e)))?;

            let key = Key::new(key_id)
                .with_hostname(self.hostname.clone())
                .with_quota(self.quota)
                .with_scopes(scopes.iter().cloned())
                .with_features(default_features());

            match self.repository.create(key).await {
                Ok(created) => {
                    info!(
                        key_prefix = %created.key().log_prefix(),
                        scopes = created.scopes().len(),
                        quota = created.quota(),
                        "Key provisioned"
                    );
                    return Ok(created);
                }
                Err(e) if e.is_duplicate_key() => {
                    warn!(attempt, "Generated key collided with an existing key");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DomainError::internal(format!(
            "Could not generate a unique key after {} attempts",
            MAX_GENERATION_ATTEMPTS
        ))
        .into())
    }
}
