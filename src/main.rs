// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout Map API Server
//!
//! Backend for the map-based workout log: stores runs and rides placed on
//! the map and persists them across sessions.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_map::{config::Config, db::FileBlobStore, services::PersistenceAdapter, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Workout Map API");

    // Open the durable blob store and start the persistence writer
    let blob_store = FileBlobStore::open(&config.data_dir)?;
    let persistence = PersistenceAdapter::spawn(Arc::new(blob_store), &config.storage_key);

    // Load stored workouts (malformed data starts an empty log)
    let state = Arc::new(AppState::load(config.clone(), persistence).await);
    tracing::info!(
        count = state.tracker.lock().await.store().len(),
        "Workouts loaded"
    );

    // Build router
    let app = workout_map::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("workout_map=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
