// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch export of cropped meshes, one OBJ file per crop volume.

use crate::registry::VolumeRegistry;
use rayon::prelude::*;
use roomcrop_geometry::{crop_with, save_obj, CropOptions, SourceMesh, SpatialVolume};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Options for a batch export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub crop: CropOptions,
    /// Crop and write volumes on the rayon pool
    pub parallel: bool,
}

/// A volume that was written successfully
#[derive(Debug, Clone, Serialize)]
pub struct ExportedVolume {
    pub id: String,
    pub path: PathBuf,
    pub vertex_count: usize,
    pub triangle_count: usize,
}

/// A volume whose export failed
#[derive(Debug, Clone, Serialize)]
pub struct ExportFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of a batch export, both lists in registry order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    pub exported: Vec<ExportedVolume>,
    pub failed: Vec<ExportFailure>,
    pub elapsed_ms: u64,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.exported.len() + self.failed.len()
    }
}

/// Crop `source` to one volume and save it as `<id>.obj` in `output_dir`
pub fn export_volume(
    source: &SourceMesh,
    volume: &SpatialVolume,
    output_dir: &Path,
    options: &CropOptions,
) -> roomcrop_geometry::Result<ExportedVolume> {
    let mesh = crop_with(source, volume, options);
    let path = save_obj(&mesh, &volume.id, output_dir)?;

    tracing::info!(
        volume_id = %volume.id,
        path = %path.display(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Mesh saved as OBJ"
    );

    Ok(ExportedVolume {
        id: volume.id.clone(),
        path,
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
    })
}

/// Export every registry volume with default options (sequential)
pub fn export_all(source: &SourceMesh, registry: &VolumeRegistry, output_dir: &Path) -> ExportReport {
    export_all_with(source, registry, output_dir, &ExportOptions::default())
}

/// Export every registry volume.
///
/// Each volume is independent: a failure is logged and recorded in the
/// report, and the remaining volumes are still exported.
pub fn export_all_with(
    source: &SourceMesh,
    registry: &VolumeRegistry,
    output_dir: &Path,
    options: &ExportOptions,
) -> ExportReport {
    let start = Instant::now();
    let volumes = registry.as_slice();

    tracing::info!(
        volumes = volumes.len(),
        output_dir = %output_dir.display(),
        parallel = options.parallel,
        containment = %options.crop.containment,
        "Starting batch export"
    );

    let run = |volume: &SpatialVolume| export_volume(source, volume, output_dir, &options.crop);
    let outcomes: Vec<_> = if options.parallel {
        volumes.par_iter().map(run).collect()
    } else {
        volumes.iter().map(run).collect()
    };

    let mut report = ExportReport::default();
    for (volume, outcome) in volumes.iter().zip(outcomes) {
        match outcome {
            Ok(exported) => report.exported.push(exported),
            Err(e) => {
                tracing::error!(volume_id = %volume.id, error = %e, "Failed to export cropped mesh");
                report.failed.push(ExportFailure {
                    id: volume.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    report.elapsed_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        exported = report.exported.len(),
        failed = report.failed.len(),
        elapsed_ms = report.elapsed_ms,
        "Batch export finished"
    );

    report
}
