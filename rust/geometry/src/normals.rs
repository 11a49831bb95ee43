// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normal recomputation

use crate::mesh::Mesh;
use nalgebra::Vector3;

/// Recompute per-vertex normals from the mesh topology.
///
/// Each triangle contributes its unnormalized face normal (so larger faces
/// weigh more) to its three vertices. Vertices not referenced by any
/// non-degenerate triangle get a zero normal. Existing normals are discarded.
pub fn calculate_normals(mesh: &mut Mesh) {
    let vertex_count = mesh.vertex_count();
    mesh.normals.clear();
    if vertex_count == 0 {
        return;
    }

    let mut normals = vec![Vector3::zeros(); vertex_count];

    for tri in mesh.indices.chunks_exact(3) {
        let i0 = tri[0] as usize;
        let i1 = tri[1] as usize;
        let i2 = tri[2] as usize;

        let v0 = mesh.position(i0);
        let v1 = mesh.position(i1);
        let v2 = mesh.position(i2);

        let normal = (v1 - v0).cross(&(v2 - v0));

        normals[i0] += normal;
        normals[i1] += normal;
        normals[i2] += normal;
    }

    mesh.normals.reserve(vertex_count * 3);
    for normal in normals {
        let normalized = normal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
        mesh.normals.push(normalized.x as f32);
        mesh.normals.push(normalized.y as f32);
        mesh.normals.push(normalized.z as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_flat_triangle_faces_up() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(0, 1, 2);

        calculate_normals(&mut mesh);
        assert_eq!(mesh.normals.len(), 9);
        for n in mesh.normals.chunks_exact(3) {
            assert_relative_eq!(n[0], 0.0);
            assert_relative_eq!(n[1], 0.0);
            assert_relative_eq!(n[2], 1.0);
        }
    }

    #[test]
    fn test_shared_vertex_averages() {
        // Two triangles folded 90° along the X axis
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 0.0, 1.0));
        mesh.add_triangle(0, 1, 2); // +Z
        mesh.add_triangle(0, 3, 1); // +Y

        calculate_normals(&mut mesh);
        let s = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(mesh.normals[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(mesh.normals[1], s, epsilon = 1e-6);
        assert_relative_eq!(mesh.normals[2], s, epsilon = 1e-6);
    }

    #[test]
    fn test_stale_normals_replaced_and_unused_vertex_zero() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_vertex(Point3::new(5.0, 5.0, 5.0));
        mesh.add_triangle(0, 1, 2);
        mesh.normals = vec![9.0; 3];

        calculate_normals(&mut mesh);
        assert_eq!(mesh.normals.len(), 12);
        assert_eq!(&mesh.normals[9..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_mesh() {
        let mut mesh = Mesh::new();
        mesh.normals = vec![1.0, 0.0, 0.0];
        calculate_normals(&mut mesh);
        assert!(mesh.normals.is_empty());
    }
}
