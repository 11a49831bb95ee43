// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Crop volume data for serialization.

use roomcrop_geometry::SpatialVolume;
use serde::{Deserialize, Serialize};

/// Registered crop volume as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeData {
    /// Volume identifier, also the export file stem.
    pub id: String,
    /// Box center in world space.
    pub position: [f64; 3],
    /// Rotation quaternion (x, y, z, w).
    pub rotation: [f64; 4],
    /// Box size along each axis, multiplier already applied.
    pub scale: [f64; 3],
}

impl From<&SpatialVolume> for VolumeData {
    fn from(volume: &SpatialVolume) -> Self {
        let q = volume.rotation.coords;
        Self {
            id: volume.id.clone(),
            position: volume.position.coords.into(),
            rotation: [q.x, q.y, q.z, q.w],
            scale: volume.scale.into(),
        }
    }
}

/// Registry listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeListResponse {
    pub count: usize,
    pub volumes: Vec<VolumeData>,
}
