// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement transforms
//!
//! A [`Transform`] is translation, rotation and non-uniform scale applied in
//! scale → rotate → translate order, the usual local-to-world convention of
//! scene hosts.

use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};

/// Translation / rotation / scale placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}

impl Transform {
    /// Identity placement
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn new(translation: Vector3<f64>, rotation: UnitQuaternion<f64>, scale: Vector3<f64>) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Build from wire components: position `[x,y,z]`, quaternion `[x,y,z,w]`, scale `[x,y,z]`
    pub fn from_components(position: [f32; 3], rotation: [f32; 4], scale: [f32; 3]) -> Self {
        Self {
            translation: Vector3::new(position[0] as f64, position[1] as f64, position[2] as f64),
            rotation: quaternion_from_xyzw(rotation),
            scale: Vector3::new(scale[0] as f64, scale[1] as f64, scale[2] as f64),
        }
    }

    /// Transform a single point
    #[inline]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords.component_mul(&self.scale) + self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Convert an `[x, y, z, w]` quaternion into a unit quaternion.
///
/// A zero (or non-finite) quaternion maps to the identity rotation.
pub fn quaternion_from_xyzw(q: [f32; 4]) -> UnitQuaternion<f64> {
    let raw = Quaternion::new(q[3] as f64, q[0] as f64, q[1] as f64, q[2] as f64);
    if !raw.coords.iter().all(|c| c.is_finite()) {
        return UnitQuaternion::identity();
    }
    UnitQuaternion::try_new(raw, 1e-12).unwrap_or_else(UnitQuaternion::identity)
}
