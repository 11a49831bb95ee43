// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ export
//!
//! Layout, in order:
//!
//! ```text
//! # Exported Mesh
//! v x y z          one per vertex
//!
//! vn x y z         one per normal
//!
//! vt u v           one per UV pair, none if the mesh has no UVs
//!
//! f a b c          one per triangle, 1-based, grouped per submesh
//! ```
//!
//! A `g <name>` line precedes each group's faces when the mesh has two or
//! more submeshes. Numbers use Rust's `Display`, which never depends on the
//! host locale.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use std::fmt::{self, Write as _};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// First line of every exported file
pub const OBJ_HEADER: &str = "# Exported Mesh";

/// File extension used by [`save_obj`]
pub const OBJ_EXTENSION: &str = "obj";

fn render(mesh: &Mesh, out: &mut String) -> fmt::Result {
    writeln!(out, "{}", OBJ_HEADER)?;

    for v in mesh.positions.chunks_exact(3) {
        writeln!(out, "v {} {} {}", v[0], v[1], v[2])?;
    }
    writeln!(out)?;

    for n in mesh.normals.chunks_exact(3) {
        writeln!(out, "vn {} {} {}", n[0], n[1], n[2])?;
    }
    writeln!(out)?;

    for uv in mesh.uvs.chunks_exact(2) {
        writeln!(out, "vt {} {}", uv[0], uv[1])?;
    }
    writeln!(out)?;

    let named_groups = mesh.submeshes.len() > 1;
    for (name, indices) in mesh.groups() {
        if named_groups {
            writeln!(out, "g {}", name)?;
        }
        // OBJ indices are 1-based
        for tri in indices.chunks_exact(3) {
            writeln!(out, "f {} {} {}", tri[0] + 1, tri[1] + 1, tri[2] + 1)?;
        }
    }

    Ok(())
}

/// Serialize a mesh to OBJ text
pub fn to_obj_string(mesh: &Mesh) -> String {
    let mut out = String::with_capacity(64 + mesh.positions.len() * 24 + mesh.indices.len() * 8);
    // Formatting into a String cannot fail
    let _ = render(mesh, &mut out);
    out
}

/// Write a mesh as OBJ text to the given writer
pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> std::io::Result<()> {
    writer.write_all(to_obj_string(mesh).as_bytes())
}

/// Check that `name` can be used as a file stem inside the export directory
pub fn validate_export_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Save a mesh to `<directory>/<name>.obj`.
///
/// Creates `directory` if needed and overwrites an existing file. Returns
/// the written path.
pub fn save_obj(mesh: &Mesh, name: &str, directory: &Path) -> Result<PathBuf> {
    validate_export_name(name)?;

    fs::create_dir_all(directory).map_err(|e| Error::io(directory, e))?;

    let path = directory.join(format!("{}.{}", name, OBJ_EXTENSION));
    let file = fs::File::create(&path).map_err(|e| Error::io(&path, e))?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer).map_err(|e| Error::io(&path, e))?;
    writer.flush().map_err(|e| Error::io(&path, e))?;

    Ok(path)
}
