// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh cropping
//!
//! Extracts the triangles of a [`SourceMesh`] that lie entirely inside a
//! [`SpatialVolume`] into a new compact [`Mesh`].
//!
//! A triangle is kept only if all three of its world-space vertices pass the
//! containment test. Triangles straddling the boundary are dropped whole;
//! nothing is clipped or split. Kept vertices are copied in their original
//! local-space coordinates, each source vertex at most once, in first-use
//! order.

use crate::mesh::{Mesh, SourceMesh, SubMesh};
use crate::normals::calculate_normals;
use crate::volume::{ContainmentMode, SpatialVolume};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Options controlling a crop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropOptions {
    /// Containment test used against the volume
    pub containment: ContainmentMode,
    /// Copy per-vertex UVs through the index remap (output UVs are empty otherwise)
    pub carry_uvs: bool,
}

/// Crop with default options (axis-aligned containment, no UVs)
pub fn crop(source: &SourceMesh, volume: &SpatialVolume) -> Mesh {
    crop_with(source, volume, &CropOptions::default())
}

/// Crop `source` to `volume`.
///
/// Never fails: a volume that excludes everything, or an empty source,
/// yields an empty mesh. Normals are always recomputed from the cropped
/// topology.
pub fn crop_with(source: &SourceMesh, volume: &SpatialVolume, options: &CropOptions) -> Mesh {
    let mesh = source.mesh();
    let carry_uvs = options.carry_uvs && mesh.has_vertex_uvs();

    // Containment is a per-vertex property; evaluate it once per vertex
    let inside: Vec<bool> = (0..mesh.vertex_count())
        .map(|i| volume.contains_with(&source.world_position(i), options.containment))
        .collect();

    let mut out = Mesh::new();
    let mut remap: FxHashMap<u32, u32> = FxHashMap::default();
    let keep_submeshes = !mesh.submeshes.is_empty();

    for (name, indices) in mesh.groups() {
        let group_start = out.indices.len();

        for tri in indices.chunks_exact(3) {
            if !tri.iter().all(|&i| inside[i as usize]) {
                continue;
            }

            for &original in tri {
                let compact = match remap.entry(original) {
                    Entry::Occupied(entry) => *entry.get(),
                    Entry::Vacant(entry) => {
                        let next = out.vertex_count() as u32;
                        out.add_vertex(mesh.position(original as usize));
                        if carry_uvs {
                            let uv = original as usize * 2;
                            out.uvs.extend_from_slice(&mesh.uvs[uv..uv + 2]);
                        }
                        *entry.insert(next)
                    }
                };
                out.indices.push(compact);
            }
        }

        let count = out.indices.len() - group_start;
        if keep_submeshes && count > 0 {
            out.submeshes.push(SubMesh::new(name, group_start, count));
        }
    }

    calculate_normals(&mut out);
    out
}
