// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Crop-box registry endpoints.

use crate::error::ApiError;
use crate::types::{VolumeData, VolumeListResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

/// GET /api/v1/cropboxes - List registered volumes in insertion order.
pub async fn list(State(state): State<AppState>) -> Json<VolumeListResponse> {
    let registry = state.registry.read().await;
    let volumes: Vec<VolumeData> = registry.iter().map(VolumeData::from).collect();
    Json(VolumeListResponse {
        count: volumes.len(),
        volumes,
    })
}

/// POST /api/v1/cropboxes - Register one incremental event.
///
/// The body is the raw event array `[urlid, position, rotation, scale]`.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<VolumeData>), ApiError> {
    let Json(body) = body?;
    let Value::Array(values) = body else {
        tracing::warn!("Crop-box event body is not a JSON array");
        return Err(ApiError::InvalidRequest("event must be a JSON array".into()));
    };

    // Decode before taking the lock
    let volume = state.ingestor.volume_from_event(&values)?;

    let mut registry = state.registry.write().await;
    let data = VolumeData::from(registry.push(volume));
    tracing::info!(volume_id = %data.id, total = registry.len(), "Registered crop volume from event");

    Ok((StatusCode::CREATED, Json(data)))
}
