use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub authorization: AuthorizationConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Key store selection
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// `memory` or `postgres`
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Connection URL, falls back to `DATABASE_URL` when unset
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_table")]
    pub table: String,
}

/// Authorization engine behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationConfig {
    /// Require and check `referer.scope` against the key's scopes
    #[serde(default = "default_true")]
    pub enforce_scopes: bool,
    /// Retry hint advertised when quota is exhausted
    #[serde(default = "default_retry_after_secs")]
    pub retry_after_secs: u64,
}

/// Defaults applied to newly provisioned keys
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisioningConfig {
    #[serde(default = "default_quota")]
    pub default_quota: u64,
    #[serde(default = "default_key_length")]
    pub key_length: usize,
    #[serde(default = "default_scope_length")]
    pub scope_length: usize,
    #[serde(default = "default_hostname")]
    pub default_hostname: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub tracing: OtlpConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// OpenTelemetry span export, off until an endpoint is configured
#[derive(Debug, Clone, Deserialize)]
pub struct OtlpConfig {
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_table() -> String {
    "authentication".to_string()
}

fn default_true() -> bool {
    true
}

fn default_retry_after_secs() -> u64 {
    10
}

fn default_quota() -> u64 {
    10_000
}

fn default_key_length() -> usize {
    16
}

fn default_scope_length() -> usize {
    6
}

fn default_hostname() -> String {
    "*".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_url: None,
            max_connections: default_max_connections(),
            table: default_table(),
        }
    }
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            enforce_scopes: true,
            retry_after_secs: default_retry_after_secs(),
        }
    }
}

impl AuthorizationConfig {
    /// Configuration for deployments that do not use scopes
    pub fn without_scopes() -> Self {
        Self {
            enforce_scopes: false,
            ..Self::default()
        }
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            default_quota: default_quota(),
            key_length: default_key_length(),
            scope_length: default_scope_length(),
            default_hostname: default_hostname(),
        }
    }
}

impl Default for OtlpConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
