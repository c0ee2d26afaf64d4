use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Environment};

/// Install the global subscriber. `RUST_LOG` wins over the configured level;
/// development gets human-readable lines, everything else JSON.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = match config.environment {
        Environment::Development => builder.try_init(),
        _ => builder.json().with_current_span(false).try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}

fn default_directives(config: &AppConfig) -> String {
    format!(
        "{},sqlx=warn,tower_http=info",
        config.server.log_level.as_directive()
    )
}
