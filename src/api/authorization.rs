//! Authorization endpoints
//!
//! - `GET /authorization/{key}` inspects a key
//! - `POST /authorization/{key}` authorizes an action and consumes quota
//! - `POST /authorization` provisions a new key

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::domain::key::{KeyView, UsageView};

use super::middleware::RequestHostname;
use super::state::AppState;
use super::types::{ApiError, AuthorizeRequest, LenientJson, ProvisionRequest};

pub fn create_authorization_router() -> Router<AppState> {
    Router::new()
        .route("/authorization", post(provision_key).fallback(unknown_route))
        .route(
            "/authorization/{key}",
            get(inspect_key).post(authorize_key).fallback(unknown_route),
        )
}

async fn inspect_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
    hostname: RequestHostname,
) -> Result<Json<KeyView>, ApiError> {
    let view = state.authorization.inspect(&key, hostname.as_str()).await?;
    Ok(Json(view))
}

/// A missing or unparsable body is an absent referer, which the engine forbids
async fn authorize_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
    hostname: RequestHostname,
    LenientJson(body): LenientJson<AuthorizeRequest>,
) -> Result<Json<UsageView>, ApiError> {
    let referer = body.and_then(|request| request.referer);

    let usage = state
        .authorization
        .authorize(&key, hostname.as_str(), referer.as_ref())
        .await?;

    Ok(Json(usage))
}

async fn provision_key(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<ProvisionRequest>,
) -> Result<Json<KeyView>, ApiError> {
    let scopes = body.and_then(|request| request.scopes);
    let key = state.provisioning.provision(scopes).await?;

    Ok(Json(KeyView::from(key)))
}

/// Fallback for unknown paths and unsupported methods
pub async fn unknown_route() -> ApiError {
    ApiError::unknown_route()
}
