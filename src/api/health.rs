//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::domain::key::KeyId;

use super::state::AppState;

/// Key looked up by the readiness probe; it need not exist
const PROBE_KEY: &str = "readiness-probe";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

/// Returns 200 while the process is serving requests
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check: the key store must answer a lookup
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let store_check = check_key_store(&state).await;
    let status = store_check.status;

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![store_check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_key_store(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    let result = match KeyId::new(PROBE_KEY) {
        Ok(probe) => state.repository.exists(&probe).await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    let (status, message) = match result {
        Ok(_) => (HealthStatus::Healthy, None),
        Err(message) => {
            tracing::warn!(error = %message, "Key store readiness check failed");
            (HealthStatus::Unhealthy, Some(message))
        }
    };

    HealthCheck {
        name: "key_store".to_string(),
        status,
        message,
        latency_ms: start.elapsed().as_millis() as u64,
    }
}
