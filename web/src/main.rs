//! VillageStay HTTP server.
//!
//! Wires the postgres store, the booking service, and the SQL-backed
//! impact queries into the Axum router and serves until shutdown.

use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use villagestay_core::{BookingService, SystemClock};
use villagestay_postgres::PostgresStore;
use villagestay_projections::PostgresImpactQueries;
use villagestay_web::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!(
                "villagestay={},tower_http=debug",
                config.server.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting VillageStay HTTP server");

    info!(url = %config.postgres.url, "Connecting to database");
    let store = Arc::new(
        PostgresStore::connect(&config.postgres.url, config.postgres.max_connections).await?,
    );
    store.run_migrations().await?;
    info!("Database ready");

    let clock = Arc::new(SystemClock);
    let service = Arc::new(BookingService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
    ));
    let impact = Arc::new(PostgresImpactQueries::new(store.pool()));
    let state = AppState::new(service, store, impact, clock);

    let router = build_router(state);
    let addr = config.bind_addr();
    info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            sig.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
