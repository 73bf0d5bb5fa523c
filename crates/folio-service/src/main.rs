use chrono::Utc;
use folio_service::{
    DefaultAppState, SiteConfig, repositories::SqliteDocumentStore, resources::seed_fixtures,
    routes::create_router,
};
use std::{sync::Arc, time::Duration};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("folio_service=debug".parse().unwrap()),
        )
        .init();

    let config = SiteConfig::from_env();
    let database_url = config.database_url;

    let store = SqliteDocumentStore::connect(&database_url).unwrap_or_else(|err| {
        error!(database_url = %database_url, error = %err, "Failed to open document store");
        std::process::exit(1);
    });

    info!(database_url = %database_url, "Connected to document store");

    if config.seed_on_start {
        match seed_fixtures(&store, Utc::now().naive_utc()) {
            Ok(count) => info!(count, "Seeded fixtures"),
            Err(err) => {
                error!(error = %err, "Failed to seed fixtures");
                std::process::exit(1);
            }
        }
    }

    let app_state = DefaultAppState::new(Arc::new(store));

    let app = create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(15))),
        )
        .with_state(app_state);

    let bind_addr =
        std::env::var("FOLIO_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|err| {
            error!(bind_address = %bind_addr, error = %err, "Failed to bind to address");
            std::process::exit(1);
        });

    info!(bind_address = %bind_addr, "Content API listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        error!(error = %err, "Server error");
        std::process::exit(1);
    }

    info!("Graceful shutdown completed");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight requests");
}
