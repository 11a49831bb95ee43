// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RoomCrop Server - crops a room mesh to crop volumes and exports OBJ files.
//!
//! At start-up the room mesh is loaded and placed in world space, and the
//! optional crop-box batch list is registered. Further volumes arrive as
//! incremental events; an export request writes one `<id>.obj` per volume.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/cropboxes` - List registered crop volumes
//! - `POST /api/v1/cropboxes` - Register a volume from an event array
//! - `POST /api/v1/export` - Crop and export every registered volume

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use roomcrop_geometry::SourceMesh;
use roomcrop_processing::{IngestSettings, Ingestor, VolumeRegistry};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<SourceMesh>,
    pub registry: Arc<RwLock<VolumeRegistry>>,
    pub ingestor: Arc<Ingestor>,
    pub config: Arc<Config>,
}

/// Build the router over the given state.
pub fn app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Crop volumes
        .route(
            "/api/v1/cropboxes",
            get(routes::cropboxes::list).post(routes::cropboxes::register),
        )
        // Export trigger
        .route("/api/v1/export", post(routes::export::export_now))
        // Middleware
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug,roomcrop_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        room_mesh = %config.room_mesh_path.display(),
        export_dir = %config.export_dir.display(),
        containment = %config.containment,
        parallel_export = config.parallel_export,
        worker_threads = config.worker_threads,
        "Starting RoomCrop Server"
    );

    // Initialize rayon thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("Failed to initialize rayon thread pool")?;

    let source = services::load_room(&config.room_mesh_path, services::room_transform(&config))?;

    let ingestor = Ingestor::new(IngestSettings {
        batch_scale_multiplier: config.batch_scale_multiplier,
        event_scale_multiplier: config.event_scale_multiplier,
    });
    let registry = services::load_initial_volumes(&config, &ingestor);
    tracing::info!(volumes = registry.len(), "Crop volume registry ready");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let state = AppState {
        source: Arc::new(source),
        registry: Arc::new(RwLock::new(registry)),
        ingestor: Arc::new(ingestor),
        config: Arc::new(config),
    };

    let router = app(state);

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router).await.context("Server error")?;

    Ok(())
}
