// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Append-only crop volume registry.

use roomcrop_geometry::SpatialVolume;
use rustc_hash::FxHashSet;

/// Ordered collection of crop volumes for one session.
///
/// Volumes are only ever appended. Identifiers are expected to be unique; a
/// repeated identifier is accepted (and logged) and its export will overwrite
/// the earlier volume's file.
#[derive(Debug, Clone, Default)]
pub struct VolumeRegistry {
    volumes: Vec<SpatialVolume>,
    ids: FxHashSet<String>,
}

impl VolumeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a volume, returning a reference to the stored entry
    pub fn push(&mut self, volume: SpatialVolume) -> &SpatialVolume {
        if !self.ids.insert(volume.id.clone()) {
            tracing::warn!(volume_id = %volume.id, "Duplicate crop volume id; later export overwrites earlier");
        }
        let index = self.volumes.len();
        self.volumes.push(volume);
        &self.volumes[index]
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Most recently added volume with the given id
    pub fn get(&self, id: &str) -> Option<&SpatialVolume> {
        self.volumes.iter().rev().find(|v| v.id == id)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SpatialVolume> {
        self.volumes.iter()
    }

    pub fn as_slice(&self) -> &[SpatialVolume] {
        &self.volumes
    }
}

impl Extend<SpatialVolume> for VolumeRegistry {
    fn extend<I: IntoIterator<Item = SpatialVolume>>(&mut self, iter: I) {
        for volume in iter {
            self.push(volume);
        }
    }
}
