//! Storage backends and backend selection

mod factory;
mod postgres;

pub use factory::{create_key_repository, StorageType};
pub use postgres::PostgresConfig;
