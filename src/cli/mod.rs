//! CLI module for the key authorization gateway
//!
//! - `serve`: run the HTTP server
//! - `create-key`: provision a key against the configured store

pub mod create_key;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::observability::init_tracing;

/// Key Authorization Gateway - API key inspection, authorization and quota
#[derive(Parser)]
#[command(name = "key-authorization-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Provision a new key and print it as JSON
    CreateKey(create_key::CreateKeyArgs),
}

/// Load `.env` and layered configuration
///
/// Falls back to defaults when the configuration cannot be read.
fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();

    AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    })
}

fn init_observability(config: &AppConfig) {
    init_tracing(&config.logging, &config.observability.tracing);
}
