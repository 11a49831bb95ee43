// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub room_vertices: usize,
    pub room_triangles: usize,
    pub volumes: usize,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let volumes = state.registry.read().await.len();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "roomcrop-server",
        room_vertices: state.source.mesh().vertex_count(),
        room_triangles: state.source.mesh().triangle_count(),
        volumes,
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "roomcrop-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Crops a room mesh to registered volumes and exports OBJ files",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check endpoint",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/cropboxes",
                description: "List registered crop volumes",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/cropboxes",
                description: "Register a crop volume from a [urlid, position, rotation, scale] event",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/export",
                description: "Crop the room to every volume and write one OBJ per volume",
            },
        ],
    })
}
