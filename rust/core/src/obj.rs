// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ parser using nom
//!
//! Reads the room mesh that crop boxes are applied to. Supports:
//!
//! - `v`, `vt`, `vn` attribute statements
//! - `f` faces in `v`, `v/vt`, `v//vn` and `v/vt/vn` forms; polygons are
//!   fan-triangulated and negative (relative) indices are resolved
//! - `g` and `o` start a new named group; `usemtl` starts one named after
//!   the material only while no `g`/`o` name is active
//!
//! Every other statement (`s`, `mtllib`, `l`, ...) is skipped.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, digit1, space0, space1},
    combinator::{map_res, opt, recognize, rest},
    multi::many1,
    sequence::{pair, preceded},
    IResult,
};

use crate::error::{Error, Result};

/// Name of the group that collects faces declared before any `g`/`o`/`usemtl`
pub const DEFAULT_GROUP: &str = "default";

/// A named, contiguous range of the triangle index list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjGroup {
    pub name: String,
    /// First index (not triangle) of the group
    pub start: usize,
    /// Number of indices in the group, always a multiple of 3
    pub count: usize,
}

/// Parsed OBJ content, flattened
#[derive(Debug, Clone, Default)]
pub struct ObjData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Texture coordinates (u, v) in declaration order
    pub uvs: Vec<f32>,
    /// Normals (nx, ny, nz) in declaration order
    pub normals: Vec<f32>,
    /// 0-based triangle indices into `positions`
    pub indices: Vec<u32>,
    /// Per-corner 0-based index into `uvs`, parallel to `indices`
    pub uv_indices: Vec<Option<u32>>,
    /// Per-corner 0-based index into `normals`, parallel to `indices`
    pub normal_indices: Vec<Option<u32>>,
    /// Non-empty groups in file order, covering `indices` exactly
    pub groups: Vec<ObjGroup>,
}

impl ObjData {
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

    /// Texture coordinates re-indexed per position vertex.
    ///
    /// `None` unless every face corner names a `vt` and each vertex is always
    /// paired with the same one. Vertices no face uses get `(0, 0)`.
    pub fn vertex_uvs(&self) -> Option<Vec<f32>> {
        self.per_vertex(&self.uv_indices, &self.uvs, 2)
    }

    /// Normals re-indexed per position vertex, under the same rule as [`Self::vertex_uvs`]
    pub fn vertex_normals(&self) -> Option<Vec<f32>> {
        self.per_vertex(&self.normal_indices, &self.normals, 3)
    }

    fn per_vertex(&self, corners: &[Option<u32>], values: &[f32], width: usize) -> Option<Vec<f32>> {
        if values.is_empty() || self.indices.is_empty() || corners.len() != self.indices.len() {
            return None;
        }

        let mut assigned: Vec<Option<u32>> = vec![None; self.vertex_count()];
        for (&vertex, &attribute) in self.indices.iter().zip(corners) {
            let attribute = attribute?;
            let slot = &mut assigned[vertex as usize];
            match *slot {
                None => *slot = Some(attribute),
                Some(existing) if existing == attribute => {}
                // Vertex shared across a seam
                Some(_) => return None,
            }
        }

        let mut out = vec![0.0; self.vertex_count() * width];
        for (vertex, attribute) in assigned.iter().enumerate() {
            if let Some(attribute) = attribute {
                let src = *attribute as usize * width;
                out[vertex * width..(vertex + 1) * width].copy_from_slice(values.get(src..src + width)?);
            }
        }
        Some(out)
    }
}

/// One face corner: position index plus optional `vt` and `vn` indices, as written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Corner {
    position: i64,
    texcoord: Option<i64>,
    normal: Option<i64>,
}

#[derive(Debug, PartialEq)]
enum Statement<'a> {
    Position(Vec<f32>),
    TexCoord(Vec<f32>),
    Normal(Vec<f32>),
    Face(Vec<Corner>),
    Group(&'a str),
    Material(&'a str),
    Ignored,
}

/// Parse a float token with fast-float
fn number(input: &str) -> IResult<&str, f32> {
    map_res(take_while1(|c: char| !c.is_whitespace()), |s: &str| {
        fast_float::parse::<f32, _>(s)
    })(input)
}

fn numbers(input: &str) -> IResult<&str, Vec<f32>> {
    many1(preceded(space1, number))(input)
}

fn index(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

/// Parse one face corner: `7`, `7/2`, `7//3`, `-1/2/3`
fn face_vertex(input: &str) -> IResult<&str, Corner> {
    let (input, position) = index(input)?;
    let (input, texcoord) = opt(preceded(char('/'), opt(index)))(input)?;
    let (input, normal) = match texcoord {
        Some(_) => opt(preceded(char('/'), index))(input)?,
        None => (input, None),
    };
    Ok((
        input,
        Corner {
            position,
            texcoord: texcoord.flatten(),
            normal,
        },
    ))
}

fn face(input: &str) -> IResult<&str, Vec<Corner>> {
    many1(preceded(space1, face_vertex))(input)
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

fn statement(line: &str) -> IResult<&str, Statement<'_>> {
    let (input, key) = keyword(line)?;
    match key {
        "v" => {
            let (input, values) = numbers(input)?;
            Ok((input, Statement::Position(values)))
        }
        "vt" => {
            let (input, values) = numbers(input)?;
            Ok((input, Statement::TexCoord(values)))
        }
        "vn" => {
            let (input, values) = numbers(input)?;
            Ok((input, Statement::Normal(values)))
        }
        "f" => {
            let (input, corners) = face(input)?;
            Ok((input, Statement::Face(corners)))
        }
        "g" | "o" => {
            let (input, name) = preceded(space0, rest)(input)?;
            Ok((input, Statement::Group(name.trim())))
        }
        "usemtl" => {
            let (input, name) = preceded(space0, rest)(input)?;
            Ok((input, Statement::Material(name.trim())))
        }
        _ => Ok(("", Statement::Ignored)),
    }
}

/// Strip a trailing `#` comment and surrounding whitespace
fn content(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => line[..pos].trim(),
        None => line.trim(),
    }
}

/// Resolve a 1-based or negative OBJ index against the elements defined so far
fn resolve_index(index: i64, count: usize, kind: &'static str, line: usize) -> Result<u32> {
    let resolved = if index > 0 {
        index - 1
    } else if index < 0 {
        count as i64 + index
    } else {
        return Err(Error::obj(line, format!("{} index 0 is not valid in OBJ", kind)));
    };

    if resolved < 0 || resolved >= count as i64 {
        return Err(Error::IndexOutOfRange {
            line,
            kind,
            index,
            count,
        });
    }
    Ok(resolved as u32)
}

fn resolve_optional(index: Option<i64>, count: usize, kind: &'static str, line: usize) -> Result<Option<u32>> {
    index.map(|i| resolve_index(i, count, kind, line)).transpose()
}

struct GroupBuilder {
    groups: Vec<ObjGroup>,
    name: String,
    start: usize,
    /// A `g`/`o` name is active, so `usemtl` leaves grouping alone
    named: bool,
}

impl GroupBuilder {
    fn new() -> Self {
        Self {
            groups: Vec::new(),
            name: DEFAULT_GROUP.to_string(),
            start: 0,
            named: false,
        }
    }

    fn close(&mut self, end: usize) {
        if end > self.start {
            self.groups.push(ObjGroup {
                name: std::mem::take(&mut self.name),
                start: self.start,
                count: end - self.start,
            });
        }
    }

    fn begin(&mut self, name: &str, at: usize) {
        self.close(at);
        self.name = if name.is_empty() {
            DEFAULT_GROUP.to_string()
        } else {
            name.to_string()
        };
        self.start = at;
    }

    fn group(&mut self, name: &str, at: usize) {
        self.begin(name, at);
        self.named = !name.is_empty();
    }

    fn material(&mut self, name: &str, at: usize) {
        if !self.named {
            self.begin(name, at);
        }
    }

    fn finish(mut self, end: usize) -> Vec<ObjGroup> {
        self.close(end);
        self.groups
    }
}

/// Parse OBJ text into flat attribute and index buffers
pub fn parse_obj(text: &str) -> Result<ObjData> {
    let mut data = ObjData::default();
    let mut groups = GroupBuilder::new();

    for (line_index, raw) in text.lines().enumerate() {
        let line_no = line_index + 1;
        let line = content(raw);
        if line.is_empty() {
            continue;
        }

        let (remaining, stmt) = statement(line)
            .map_err(|e| Error::obj(line_no, format!("malformed statement: {}", e)))?;
        if !remaining.trim().is_empty() {
            return Err(Error::obj(
                line_no,
                format!("unexpected trailing input '{}'", remaining.trim()),
            ));
        }

        match stmt {
            Statement::Position(values) => {
                if values.len() < 3 {
                    return Err(Error::obj(line_no, "vertex needs 3 coordinates"));
                }
                // A fourth (w) component is accepted and ignored
                data.positions.extend_from_slice(&values[..3]);
            }
            Statement::TexCoord(values) => {
                let u = values[0];
                let v = values.get(1).copied().unwrap_or(0.0);
                data.uvs.push(u);
                data.uvs.push(v);
            }
            Statement::Normal(values) => {
                if values.len() != 3 {
                    return Err(Error::obj(line_no, "normal needs 3 components"));
                }
                data.normals.extend_from_slice(&values);
            }
            Statement::Face(corners) => {
                if corners.len() < 3 {
                    return Err(Error::obj(line_no, "face needs at least 3 vertices"));
                }
                let positions = data.vertex_count();
                let uvs = data.uvs.len() / 2;
                let normals = data.normals.len() / 3;
                let mut resolved = Vec::with_capacity(corners.len());
                for corner in &corners {
                    resolved.push((
                        resolve_index(corner.position, positions, "vertex", line_no)?,
                        resolve_optional(corner.texcoord, uvs, "texture coordinate", line_no)?,
                        resolve_optional(corner.normal, normals, "normal", line_no)?,
                    ));
                }

                // Fan triangulation around the first corner
                for k in 1..resolved.len() - 1 {
                    for &(position, uv, normal) in [&resolved[0], &resolved[k], &resolved[k + 1]] {
                        data.indices.push(position);
                        data.uv_indices.push(uv);
                        data.normal_indices.push(normal);
                    }
                }
            }
            Statement::Group(name) => groups.group(name, data.indices.len()),
            Statement::Material(name) => groups.material(name, data.indices.len()),
            Statement::Ignored => {}
        }
    }

    data.groups = groups.finish(data.indices.len());
    Ok(data)
}
