//! Request bodies for the authorization endpoints

use serde::{Deserialize, Serialize};

use crate::domain::authorization::Referer;

/// Body of `POST /authorization/{key}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    #[serde(default)]
    pub referer: Option<Referer>,
}

/// Body of `POST /authorization`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisionRequest {
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
}
