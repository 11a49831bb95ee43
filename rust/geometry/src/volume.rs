// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Crop volumes
//!
//! A [`SpatialVolume`] is a named box centered on its world position whose
//! size is its world scale. The default containment test is axis-aligned in
//! world space: the stored rotation places the crop box in the host scene
//! but does not rotate the box used for cropping. [`ContainmentMode::Oriented`]
//! opts into rotating the test box.

use crate::transform::quaternion_from_xyzw;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use roomcrop_core::CropBoxRecord;
use std::fmt;
use std::str::FromStr;

/// How the crop box is tested against points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContainmentMode {
    /// World axis-aligned box, rotation ignored
    #[default]
    AxisAligned,
    /// Box rotated by the volume's rotation
    Oriented,
}

impl FromStr for ContainmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "axis-aligned" | "axis_aligned" | "aabb" | "legacy" => Ok(ContainmentMode::AxisAligned),
            "oriented" | "obb" | "strict" => Ok(ContainmentMode::Oriented),
            other => Err(format!("unknown containment mode '{}'", other)),
        }
    }
}

impl fmt::Display for ContainmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainmentMode::AxisAligned => f.write_str("axis-aligned"),
            ContainmentMode::Oriented => f.write_str("oriented"),
        }
    }
}

/// A named crop region
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialVolume {
    /// Unique identifier, used as the export file stem
    pub id: String,
    /// Box center in world space
    pub position: Point3<f64>,
    /// Placement rotation
    pub rotation: UnitQuaternion<f64>,
    /// Full box size per axis
    pub scale: Vector3<f64>,
}

impl SpatialVolume {
    pub fn new(
        id: impl Into<String>,
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
        scale: Vector3<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            rotation,
            scale,
        }
    }

    /// Axis-aligned volume with identity rotation
    pub fn axis_aligned(id: impl Into<String>, center: Point3<f64>, size: Vector3<f64>) -> Self {
        Self::new(id, center, UnitQuaternion::identity(), size)
    }

    /// Build from a decoded record, multiplying its scale by `scale_multiplier`
    pub fn from_record(record: &CropBoxRecord, scale_multiplier: f32) -> Self {
        let [px, py, pz] = record.position;
        let [sx, sy, sz] = record.scale.map(|s| s * scale_multiplier);
        Self {
            id: record.urlid.clone(),
            position: Point3::new(px as f64, py as f64, pz as f64),
            rotation: quaternion_from_xyzw(record.rotation),
            scale: Vector3::new(sx as f64, sy as f64, sz as f64),
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vector3<f64> {
        self.scale / 2.0
    }

    /// Inclusive containment: `|p.a - c.a| <= s.a / 2` on every axis.
    ///
    /// Rotation is not applied.
    #[inline]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        within(&(point - self.position), &self.half_extents())
    }

    /// Containment under the given mode
    #[inline]
    pub fn contains_with(&self, point: &Point3<f64>, mode: ContainmentMode) -> bool {
        match mode {
            ContainmentMode::AxisAligned => self.contains(point),
            ContainmentMode::Oriented => {
                let local = self.rotation.inverse_transform_vector(&(point - self.position));
                within(&local, &self.half_extents())
            }
        }
    }
}

#[inline]
fn within(offset: &Vector3<f64>, half: &Vector3<f64>) -> bool {
    offset.x.abs() <= half.x && offset.y.abs() <= half.y && offset.z.abs() <= half.z
}
