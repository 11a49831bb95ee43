// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Crop-box ingestion routes.
//!
//! Volumes arrive either as a one-shot batch list or as incremental events.
//! Each route multiplies the decoded scale by its own factor; the batch route
//! enlarges boxes by 2.3 by default while events are taken as-is.

use crate::error::{Error, Result};
use crate::registry::VolumeRegistry;
use roomcrop_core::{decode_cropbox_list, CropBoxRecord};
use roomcrop_geometry::SpatialVolume;
use serde_json::Value;
use std::path::Path;

/// Scale factor applied to batch-loaded crop boxes
pub const DEFAULT_BATCH_SCALE_MULTIPLIER: f32 = 2.3;

/// Scale factor applied to crop boxes from incremental events
pub const DEFAULT_EVENT_SCALE_MULTIPLIER: f32 = 1.0;

/// Per-route ingestion parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestSettings {
    pub batch_scale_multiplier: f32,
    pub event_scale_multiplier: f32,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            batch_scale_multiplier: DEFAULT_BATCH_SCALE_MULTIPLIER,
            event_scale_multiplier: DEFAULT_EVENT_SCALE_MULTIPLIER,
        }
    }
}

/// Turns crop-box definitions into registry entries
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    settings: IngestSettings,
}

impl Ingestor {
    pub fn new(settings: IngestSettings) -> Self {
        Self { settings }
    }

    /// Decode a batch JSON list and append every volume.
    ///
    /// The list is decoded as a whole first; on a decode error nothing is
    /// appended. Returns the number of volumes added.
    pub fn load_batch(&self, json: &str, registry: &mut VolumeRegistry) -> Result<usize> {
        let records = decode_cropbox_list(json)?;
        let count = records.len();
        registry.extend(
            records
                .iter()
                .map(|r| SpatialVolume::from_record(r, self.settings.batch_scale_multiplier)),
        );
        tracing::info!(
            count,
            scale_multiplier = self.settings.batch_scale_multiplier,
            "Loaded crop-box batch"
        );
        Ok(count)
    }

    /// Read and load a batch JSON file
    pub fn load_batch_file(&self, path: &Path, registry: &mut VolumeRegistry) -> Result<usize> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), size = json.len(), "Read crop-box batch file");
        self.load_batch(&json, registry)
    }

    /// Decode an incremental event `[urlid, position, rotation, scale]` into a volume.
    ///
    /// A malformed event is logged and returned as an error; nothing is created.
    pub fn volume_from_event(&self, values: &[Value]) -> Result<SpatialVolume> {
        match CropBoxRecord::from_event(values) {
            Ok(record) => Ok(SpatialVolume::from_record(
                &record,
                self.settings.event_scale_multiplier,
            )),
            Err(e) => {
                tracing::error!(fields = values.len(), error = %e, "Rejected crop-box event");
                Err(e.into())
            }
        }
    }

    /// Decode an incremental event and append the resulting volume
    pub fn handle_event<'r>(
        &self,
        values: &[Value],
        registry: &'r mut VolumeRegistry,
    ) -> Result<&'r SpatialVolume> {
        let volume = self.volume_from_event(values)?;
        tracing::info!(volume_id = %volume.id, "Registered crop volume from event");
        Ok(registry.push(volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcrop_geometry::Vector3;
    use serde_json::json;

    const BATCH: &str = r#"[
        {"urlid": "desk", "position": [0, 0, 0], "rotation": [0, 0, 0, 1], "scale": [1, 1, 1]},
        {"urlid": "bed", "position": [3, 0, 1], "rotation": [0, 0, 0, 1], "scale": [2, 0.5, 1]}
    ]"#;

    #[test]
    fn test_batch_applies_batch_multiplier() {
        let ingestor = Ingestor::default();
        let mut registry = VolumeRegistry::new();
        assert_eq!(ingestor.load_batch(BATCH, &mut registry).unwrap(), 2);

        let desk = registry.get("desk").unwrap();
        let expected = 2.3f32 as f64;
        assert_eq!(desk.scale, Vector3::new(expected, expected, expected));
        let ids: Vec<&str> = registry.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["desk", "bed"]);
    }

    #[test]
    fn test_batch_decode_error_adds_nothing() {
        let ingestor = Ingestor::default();
        let mut registry = VolumeRegistry::new();
        let result = ingestor.load_batch(r#"[{"urlid": "desk"}]"#, &mut registry);
        assert!(matches!(result, Err(Error::Decode(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_event_uses_event_multiplier() {
        let ingestor = Ingestor::new(IngestSettings {
            batch_scale_multiplier: 2.3,
            event_scale_multiplier: 2.0,
        });
        let mut registry = VolumeRegistry::new();
        let values = vec![json!("lamp"), json!([1, 2, 3]), json!([0, 0, 0, 1]), json!([1, 1, 0.5])];
        let volume = ingestor.handle_event(&values, &mut registry).unwrap();
        assert_eq!(volume.id, "lamp");
        assert_eq!(volume.scale, Vector3::new(2.0, 2.0, 1.0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_malformed_events_are_rejected_without_side_effects() {
        let ingestor = Ingestor::default();
        let mut registry = VolumeRegistry::new();

        let short = vec![json!("lamp"), json!([1, 2, 3])];
        assert!(ingestor.handle_event(&short, &mut registry).is_err());

        let wrong = vec![json!("lamp"), json!([1, 2, 3]), json!("rot"), json!([1, 1, 1])];
        assert!(ingestor.handle_event(&wrong, &mut registry).is_err());

        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_batch_file() {
        let ingestor = Ingestor::default();
        let mut registry = VolumeRegistry::new();
        let path = std::env::temp_dir().join("roomcrop-does-not-exist.json");
        assert!(matches!(
            ingestor.load_batch_file(&path, &mut registry),
            Err(Error::Read { .. })
        ));
    }
}
