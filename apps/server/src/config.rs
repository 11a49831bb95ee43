// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use roomcrop_geometry::ContainmentMode;
use roomcrop_processing::{DEFAULT_BATCH_SCALE_MULTIPLIER, DEFAULT_EVENT_SCALE_MULTIPLIER};
use std::path::PathBuf;
use std::str::FromStr;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Room mesh to crop (OBJ).
    pub room_mesh_path: PathBuf,
    /// Optional crop-box batch list loaded at startup.
    pub cropbox_json_path: Option<PathBuf>,
    /// Directory receiving `<id>.obj` files.
    pub export_dir: PathBuf,
    /// Room placement in world space.
    pub room_position: [f32; 3],
    pub room_rotation: [f32; 4],
    pub room_scale: [f32; 3],
    /// Scale factor for batch-loaded crop boxes.
    pub batch_scale_multiplier: f32,
    /// Scale factor for crop boxes posted as events.
    pub event_scale_multiplier: f32,
    /// How crop volume rotation is treated.
    pub containment: ContainmentMode,
    /// Carry per-vertex texture coordinates into exports.
    pub carry_uvs: bool,
    /// Export volumes on the rayon pool.
    pub parallel_export: bool,
    /// Number of worker threads for parallel processing.
    pub worker_threads: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: parse_or(&lookup, "PORT", 8080),
            room_mesh_path: lookup("ROOM_MESH_PATH")
                .unwrap_or_else(|| "./room.obj".into())
                .into(),
            cropbox_json_path: lookup("CROPBOX_JSON_PATH")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            export_dir: lookup("EXPORT_DIR")
                .unwrap_or_else(|| "./ExportedMeshes".into())
                .into(),
            room_position: components_or(&lookup, "ROOM_POSITION", [0.0; 3]),
            room_rotation: components_or(&lookup, "ROOM_ROTATION", [0.0, 0.0, 0.0, 1.0]),
            room_scale: components_or(&lookup, "ROOM_SCALE", [1.0; 3]),
            batch_scale_multiplier: parse_or(&lookup, "BATCH_SCALE_MULTIPLIER", DEFAULT_BATCH_SCALE_MULTIPLIER),
            event_scale_multiplier: parse_or(&lookup, "EVENT_SCALE_MULTIPLIER", DEFAULT_EVENT_SCALE_MULTIPLIER),
            containment: parse_or(&lookup, "CONTAINMENT_MODE", ContainmentMode::default()),
            carry_uvs: flag_or(&lookup, "CARRY_UVS", false),
            parallel_export: flag_or(&lookup, "PARALLEL_EXPORT", false),
            worker_threads: parse_or(&lookup, "WORKER_THREADS", num_cpus::get()),
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 300),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid config value, using default");
            default
        }),
        None => default,
    }
}

fn flag_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|s| s.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

/// Parse "x,y,z" style lists; anything malformed falls back to `default`
fn components_or<F, const N: usize>(lookup: &F, key: &str, default: [f32; N]) -> [f32; N]
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    let values: Vec<f32> = raw
        .split(',')
        .map(|s| s.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .unwrap_or_default();
    match <[f32; N]>::try_from(values) {
        Ok(array) => array,
        Err(_) => {
            tracing::warn!(key, value = %raw, expected = N, "Invalid vector config value, using default");
            default
        }
    }
}
