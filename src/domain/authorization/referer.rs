//! Referer descriptor - the caller's description of the action being attempted

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::feature::RequestedAction;

/// Action description supplied with an authorization request
///
/// Fields default to empty so that a partially filled descriptor still parses and
/// is rejected by [`Referer::validate`] instead of at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Referer {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
    /// Scope token; older clients send it as `akey`
    #[serde(default, alias = "akey")]
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, String>>,
}

/// Why a referer descriptor was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefererDefect {
    EmptyMethod,
    EmptyPath,
    EmptyScope,
}

impl std::fmt::Display for RefererDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMethod => write!(f, "empty_method"),
            Self::EmptyPath => write!(f, "empty_path"),
            Self::EmptyScope => write!(f, "empty_scope"),
        }
    }
}

impl Referer {
    pub fn new(method: impl Into<String>, path: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            scope: scope.into(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = Some(params);
        self
    }

    /// Check the descriptor is well formed
    ///
    /// The scope is only required when scopes are enforced.
    pub fn validate(&self, require_scope: bool) -> Result<(), RefererDefect> {
        if self.method.is_empty() {
            return Err(RefererDefect::EmptyMethod);
        }

        if self.path.is_empty() {
            return Err(RefererDefect::EmptyPath);
        }

        if require_scope && self.scope.is_empty() {
            return Err(RefererDefect::EmptyScope);
        }

        Ok(())
    }

    /// The action to evaluate against a key's features
    pub fn action(&self) -> RequestedAction<'_> {
        RequestedAction {
            method: &self.method,
            path: &self.path,
            params: self.params.as_ref(),
        }
    }
}
