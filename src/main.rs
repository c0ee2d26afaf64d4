use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use person_api::app::{app, AppState};
use person_api::cli::Cli;
use person_api::config::StoreBackend;
use person_api::database::{
    close_pool, connect_pool, InMemoryPersonRepository, PersonRepository, PostgresPersonRepository,
};
use person_api::{config, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = config::config().clone();
    cli.apply(&mut config);

    logging::init_tracing(&config);
    config.validate().context("invalid configuration")?;

    tracing::info!(
        environment = config.environment.as_str(),
        version = env!("CARGO_PKG_VERSION"),
        store = ?config.database.store,
        "starting Person API"
    );

    let (repo, pool): (Arc<dyn PersonRepository>, _) = match config.database.store {
        StoreBackend::Memory => (Arc::new(InMemoryPersonRepository::new()), None),
        StoreBackend::Postgres => {
            let pool = connect_pool(&config.database)
                .await
                .context("failed to connect to database")?;
            (Arc::new(PostgresPersonRepository::new(pool.clone())), Some(pool))
        }
    };

    let port = config.server.port;
    let grace = config.server.shutdown_grace();
    let router = app(AppState::new(config, repo));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Person API listening on http://{}", bind_addr);

    server::serve(listener, router, grace).await.context("server error")?;

    if let Some(pool) = pool {
        close_pool(&pool).await;
    }

    tracing::info!("server stopped");
    Ok(())
}
