// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room mesh loading.

use crate::config::Config;
use anyhow::Context;
use roomcrop_core::parse_obj;
use roomcrop_geometry::{SourceMesh, Transform};
use roomcrop_processing::{Ingestor, VolumeRegistry};
use std::path::Path;

/// Local-to-world placement of the room from configuration
pub fn room_transform(config: &Config) -> Transform {
    Transform::from_components(config.room_position, config.room_rotation, config.room_scale)
}

/// Read, parse and place the room mesh.
pub fn load_room(path: &Path, transform: Transform) -> anyhow::Result<SourceMesh> {
    let start = std::time::Instant::now();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read room mesh {}", path.display()))?;
    let obj = parse_obj(&text).with_context(|| format!("failed to parse room mesh {}", path.display()))?;
    let source = SourceMesh::from_obj(obj, transform)
        .with_context(|| format!("invalid room mesh {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        vertices = source.mesh().vertex_count(),
        triangles = source.mesh().triangle_count(),
        submeshes = source.mesh().submeshes.len(),
        load_time_ms = start.elapsed().as_millis() as u64,
        "Loaded room mesh"
    );

    Ok(source)
}

/// Build the start-up registry, loading the batch list when one is configured.
///
/// A broken batch file is logged and the server starts with an empty registry.
pub fn load_initial_volumes(config: &Config, ingestor: &Ingestor) -> VolumeRegistry {
    let mut registry = VolumeRegistry::new();
    if let Some(path) = &config.cropbox_json_path {
        if let Err(e) = ingestor.load_batch_file(path, &mut registry) {
            tracing::error!(path = %path.display(), error = %e, "Failed to load crop-box batch");
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("roomcrop-server-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config(pairs: &[(&str, String)]) -> Config {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_load_room_applies_transform() {
        let dir = temp_dir("room");
        let path = dir.join("room.obj");
        fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let config = config(&[("ROOM_POSITION", "10,0,0".into())]);
        let source = load_room(&path, room_transform(&config)).unwrap();
        assert_eq!(source.mesh().triangle_count(), 1);
        assert_eq!(source.world_position(1).x, 11.0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_room_is_an_error() {
        let result = load_room(Path::new("/nonexistent/room.obj"), Transform::identity());
        assert!(result.is_err());
    }

    #[test]
    fn test_initial_volumes() {
        let dir = temp_dir("volumes");
        let path = dir.join("boxes.json");
        fs::write(
            &path,
            r#"[{"urlid": "a", "position": [0, 0, 0], "rotation": [0, 0, 0, 1], "scale": [1, 1, 1]}]"#,
        )
        .unwrap();

        let ingestor = Ingestor::default();
        let loaded = load_initial_volumes(&config(&[("CROPBOX_JSON_PATH", path.display().to_string())]), &ingestor);
        assert_eq!(loaded.len(), 1);

        let broken = dir.join("broken.json");
        fs::write(&broken, "{not json").unwrap();
        let empty = load_initial_volumes(&config(&[("CROPBOX_JSON_PATH", broken.display().to_string())]), &ingestor);
        assert!(empty.is_empty());

        assert!(load_initial_volumes(&config(&[]), &ingestor).is_empty());

        let _ = fs::remove_dir_all(&dir);
    }
}
