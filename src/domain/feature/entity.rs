//! Feature entity

use serde::{Deserialize, Serialize};

use super::path::PathTemplate;

/// One action a key may invoke: an HTTP method plus a path template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub method: String,
    pub path: String,
}

impl Feature {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn template(&self) -> PathTemplate<'_> {
        PathTemplate::parse(&self.path)
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
