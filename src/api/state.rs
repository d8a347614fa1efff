//! Application state for shared services

use std::sync::Arc;

use crate::config::{AuthorizationConfig, ProvisioningConfig};
use crate::domain::key::KeyRepository;
use crate::infrastructure::authorization::AuthorizationService;
use crate::infrastructure::key::KeyProvisioningService;

/// Services shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub authorization: Arc<AuthorizationService>,
    pub provisioning: Arc<KeyProvisioningService>,
    /// Store handle used by the readiness probe
    pub repository: Arc<dyn KeyRepository>,
}

impl AppState {
    /// Wire both services onto one key store
    pub fn new(
        repository: Arc<dyn KeyRepository>,
        authorization: &AuthorizationConfig,
        provisioning: &ProvisioningConfig,
    ) -> Self {
        Self {
            authorization: Arc::new(AuthorizationService::new(repository.clone(), authorization)),
            provisioning: Arc::new(KeyProvisioningService::new(repository.clone(), provisioning)),
            repository,
        }
    }
}
