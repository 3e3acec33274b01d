// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! StudyStreak API Server
//!
//! Serves streak statistics and the activity heatmap for the study
//! application, ingesting completed sessions and keeping the derived
//! state fresh with a background poller.

use std::sync::Arc;

use studystreak::{
    config::Config,
    db::FirestoreDb,
    services::{SessionProcessor, StreakEngine},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting StudyStreak API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize the streak engine and start the background poller
    let engine = Arc::new(StreakEngine::new(db.clone()));
    Arc::clone(&engine).spawn_poller();
    tracing::info!("Streak refresh poller started");

    let sessions = SessionProcessor::new(db.clone(), Arc::clone(&engine));

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        engine,
        sessions,
    });

    // Build router
    let app = studystreak::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("studystreak=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
