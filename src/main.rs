use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_service::config::AppConfig;
use order_service::domain::order::{CreateOrderHandler, FindOrderHandler};
use order_service::http::{start_server, AppState};
use order_service::metrics::Metrics;
use order_service::store::PgStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_service=debug"))
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        http_host = %config.http.host,
        http_port = config.http.port,
        max_connections = config.database.max_connections,
        "Loaded configuration"
    );

    // === 1. Connect to PostgreSQL ===
    let store = Arc::new(PgStore::connect(&config.database).await?);

    if config.database.run_migrations {
        store.migrate().await?;
    }

    // === 2. Initialize Prometheus metrics ===
    let metrics = Arc::new(Metrics::new()?);

    // === 3. Wire the order workflows ===
    let state = AppState {
        create_order: Arc::new(CreateOrderHandler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            metrics.clone(),
        )),
        find_order: Arc::new(FindOrderHandler::new(store, metrics.clone())),
        metrics,
    };

    // === 4. Serve HTTP until shutdown ===
    start_server(state, &config.http.host, config.http.port).await?;

    tracing::info!("Order service stopped");
    Ok(())
}
