// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export trigger endpoint.

use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use roomcrop_geometry::CropOptions;
use roomcrop_processing::{export_all_with, ExportOptions, ExportReport};

/// POST /api/v1/export - Crop the room to every registered volume.
///
/// Works on a snapshot of the registry, so events posted during an export
/// are picked up by the next one.
pub async fn export_now(State(state): State<AppState>) -> Result<Json<ExportReport>, ApiError> {
    let snapshot = state.registry.read().await.clone();
    let source = state.source.clone();
    let output_dir = state.config.export_dir.clone();
    let options = ExportOptions {
        crop: CropOptions {
            containment: state.config.containment,
            carry_uvs: state.config.carry_uvs,
        },
        parallel: state.config.parallel_export,
    };

    tracing::info!(volumes = snapshot.len(), "Export triggered");

    // Cropping and file writes are blocking work
    let report = tokio::task::spawn_blocking(move || {
        export_all_with(&source, &snapshot, &output_dir, &options)
    })
    .await?;

    if !report.is_success() {
        tracing::warn!(failed = report.failed.len(), total = report.total(), "Export finished with failures");
    }

    Ok(Json(report))
}
