//! Infrastructure layer - Stores, services and observability

pub mod authorization;
pub mod key;
pub mod observability;
pub mod quota;
pub mod storage;
