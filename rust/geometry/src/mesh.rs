// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::error::{Error, Result};
use crate::transform::Transform;
use nalgebra::Point3;
use roomcrop_core::ObjData;

/// Name reported for the implicit group of a mesh without submeshes
pub const DEFAULT_SUBMESH: &str = "default";

/// A named, contiguous range of a mesh's index list (typically one material)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMesh {
    pub name: String,
    /// First index (not triangle) of the range
    pub start: usize,
    /// Number of indices in the range
    pub count: usize,
}

impl SubMesh {
    /// Create a new sub-mesh range
    pub fn new(name: impl Into<String>, start: usize, count: usize) -> Self {
        Self {
            name: name.into(),
            start,
            count,
        }
    }
}

/// Triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v), either empty or one pair per vertex
    pub uvs: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
    /// Submesh partitioning of `indices`; empty means a single implicit group
    pub submeshes: Vec<SubMesh>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            submeshes: Vec::new(),
        }
    }

    /// Add a vertex position
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Position of vertex `index`
    #[inline]
    pub fn position(&self, index: usize) -> Point3<f64> {
        Point3::new(
            self.positions[index * 3] as f64,
            self.positions[index * 3 + 1] as f64,
            self.positions[index * 3 + 2] as f64,
        )
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// True when there is exactly one UV pair per vertex
    #[inline]
    pub fn has_vertex_uvs(&self) -> bool {
        !self.uvs.is_empty() && self.uvs.len() / 2 == self.vertex_count()
    }

    /// Triangle index lists per submesh, in submesh order.
    ///
    /// A mesh without submeshes yields a single [`DEFAULT_SUBMESH`] group
    /// holding every index.
    pub fn groups(&self) -> Vec<(&str, &[u32])> {
        if self.submeshes.is_empty() {
            return vec![(DEFAULT_SUBMESH, self.indices.as_slice())];
        }
        self.submeshes
            .iter()
            .map(|sub| {
                let range = sub.start..sub.start + sub.count;
                (sub.name.as_str(), self.indices.get(range).unwrap_or(&[]))
            })
            .collect()
    }

    /// Check the structural invariants: whole triangles, indices in range,
    /// and submeshes tiling the index list in order.
    pub fn validate(&self) -> Result<()> {
        if self.positions.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "position buffer length {} is not a multiple of 3",
                self.positions.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }

        let vertex_count = self.vertex_count();
        for (triangle, tri) in self.indices.chunks_exact(3).enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(Error::IndexOutOfBounds {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }

        if !self.submeshes.is_empty() {
            let mut expected_start = 0;
            for sub in &self.submeshes {
                if sub.start != expected_start || sub.count % 3 != 0 {
                    return Err(Error::InvalidMesh(format!(
                        "submesh '{}' range {}+{} does not continue at index {}",
                        sub.name, sub.start, sub.count, expected_start
                    )));
                }
                expected_start += sub.count;
            }
            if expected_start != self.indices.len() {
                return Err(Error::InvalidMesh(format!(
                    "submeshes cover {} of {} indices",
                    expected_start,
                    self.indices.len()
                )));
            }
        }

        Ok(())
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// The reference room mesh a crop pass reads from.
///
/// Construction validates the mesh once, so cropping can index it freely.
#[derive(Debug, Clone)]
pub struct SourceMesh {
    mesh: Mesh,
    local_to_world: Transform,
}

impl SourceMesh {
    /// Wrap a mesh and its placement, failing fast on malformed topology
    pub fn new(mesh: Mesh, local_to_world: Transform) -> Result<Self> {
        mesh.validate()?;
        Ok(Self {
            mesh,
            local_to_world,
        })
    }

    /// Build from parsed OBJ data.
    ///
    /// OBJ normals and UVs are indexed per face corner; each is kept only
    /// when every vertex pairs with a single one of them across all faces.
    /// A single group collapses to an implicit submesh.
    pub fn from_obj(obj: ObjData, local_to_world: Transform) -> Result<Self> {
        let normals = obj.vertex_normals().unwrap_or_default();
        let uvs = obj.vertex_uvs().unwrap_or_default();
        let submeshes = if obj.groups.len() > 1 {
            obj.groups
                .into_iter()
                .map(|g| SubMesh::new(g.name, g.start, g.count))
                .collect()
        } else {
            Vec::new()
        };

        let mesh = Mesh {
            normals,
            uvs,
            positions: obj.positions,
            indices: obj.indices,
            submeshes,
        };

        Self::new(mesh, local_to_world)
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn local_to_world(&self) -> &Transform {
        &self.local_to_world
    }

    /// World-space position of vertex `index`
    #[inline]
    pub fn world_position(&self, index: usize) -> Point3<f64> {
        self.local_to_world.transform_point(&self.mesh.position(index))
    }
}
