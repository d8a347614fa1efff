//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthorizationConfig, LogFormat, LoggingConfig, MetricsConfig, ObservabilityConfig,
    OtlpConfig, ProvisioningConfig, ServerConfig, StorageConfig,
};
