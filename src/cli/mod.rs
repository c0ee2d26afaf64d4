use clap::Parser;

use crate::config::{AppConfig, StoreBackend};

/// Command-line overrides. Anything left unset falls back to the
/// environment-derived configuration.
#[derive(Debug, Parser)]
#[command(name = "person-api-rust")]
#[command(about = "Person CRUD HTTP service")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, value_enum, help = "Person store backend (overrides PERSON_STORE)")]
    pub store: Option<StoreBackend>,
}

impl Cli {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(store) = self.store {
            config.database.store = store;
        }
    }
}
