use std::sync::Arc;
use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use directory_cell::handlers::DirectoryCellState;
use directory_cell::{default_feed, load_feed_from_path, HospitalDirectory, StatusController};
use queue_cell::handlers::QueueCellState;
use queue_cell::{NotificationDispatcher, SchedulingEngine};
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MediQueue API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Hospital directory
    let feed = match &config.directory_seed_path {
        Some(path) => load_feed_from_path(path)
            .with_context(|| format!("Failed to load hospital directory from {}", path))?,
        None => default_feed(),
    };
    let directory = Arc::new(HospitalDirectory::from_feed(feed)?);

    // Queue engine and alert delivery
    let engine = Arc::new(SchedulingEngine::new(
        StatusController::new(directory.clone()),
        &config,
    ));
    let dispatcher = NotificationDispatcher::with_log_transport(engine.clone());

    let directory_state = Arc::new(DirectoryCellState::new(directory));
    let queue_state = Arc::new(QueueCellState::new(engine, dispatcher));

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(directory_state, queue_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
