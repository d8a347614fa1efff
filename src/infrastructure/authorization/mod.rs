//! Authorization engine

mod service;

pub use service::AuthorizationService;
