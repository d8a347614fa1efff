//! Key Authorization Gateway
//!
//! Answers "may this API key perform this action right now?" for upstream
//! services:
//! - Hostname binding and scope checks per key
//! - Templated feature matching (`GET /logs/:akey/:id`)
//! - Atomic per-key quota accounting
//! - Key provisioning with a default feature set

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use infrastructure::storage::create_key_repository;
use tracing::info;

/// Create the application state with default configuration (in-memory store)
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let repository = create_key_repository(&config.storage).await?;

    info!(
        backend = %config.storage.backend,
        enforce_scopes = config.authorization.enforce_scopes,
        "Application state initialized"
    );

    Ok(AppState::new(
        repository,
        &config.authorization,
        &config.provisioning,
    ))
}
