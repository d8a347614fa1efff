//! Key infrastructure - stores, generation and provisioning

mod defaults;
mod generator;
mod in_memory;
mod postgres;
mod service;

pub use defaults::default_features;
pub use generator::{KeyGenerator, DEFAULT_KEY_LENGTH};
pub use in_memory::InMemoryKeyRepository;
pub use postgres::PostgresKeyRepository;
pub use service::KeyProvisioningService;
