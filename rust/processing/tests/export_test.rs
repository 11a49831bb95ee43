// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use roomcrop_core::parse_obj;
use roomcrop_geometry::{Point3, SourceMesh, SpatialVolume, Transform, Vector3};
use roomcrop_processing::{export_all, export_all_with, ExportOptions, IngestSettings, Ingestor, VolumeRegistry};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

/// Two unit quads side by side: one at x in [0, 1], one at x in [3, 4]
const ROOM: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 3 0 0
v 4 0 0
v 4 1 0
v 3 1 0
g left
f 1 2 3 4
g right
f 5 6 7 8
";

fn room() -> SourceMesh {
    SourceMesh::from_obj(parse_obj(ROOM).unwrap(), Transform::identity()).unwrap()
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("roomcrop-processing-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn registry() -> VolumeRegistry {
    let mut registry = VolumeRegistry::new();
    registry.push(SpatialVolume::axis_aligned("left", Point3::new(0.5, 0.5, 0.0), Vector3::new(1.0, 1.0, 1.0)));
    registry.push(SpatialVolume::axis_aligned("right", Point3::new(3.5, 0.5, 0.0), Vector3::new(1.0, 1.0, 1.0)));
    registry.push(SpatialVolume::axis_aligned("nothing", Point3::new(50.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)));
    registry
}

#[test]
fn exports_one_file_per_volume_in_registry_order() {
    let dir = temp_dir("order");
    let report = export_all(&room(), &registry(), &dir);

    assert!(report.is_success());
    let ids: Vec<&str> = report.exported.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["left", "right", "nothing"]);

    assert_eq!(report.exported[0].triangle_count, 2);
    assert_eq!(report.exported[0].vertex_count, 4);
    assert_eq!(report.exported[2].triangle_count, 0);

    let left = fs::read_to_string(dir.join("left.obj")).unwrap();
    assert!(left.starts_with("# Exported Mesh\n"));
    // Local coordinates of the left quad only
    assert!(left.contains("v 1 1 0"));
    assert!(!left.contains("v 4 1 0"));

    let nothing = fs::read_to_string(dir.join("nothing.obj")).unwrap();
    assert_eq!(nothing, "# Exported Mesh\n\n\n\n");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn one_failing_volume_does_not_abort_the_batch() {
    let dir = temp_dir("failure");
    let mut registry = registry();
    registry.push(SpatialVolume::axis_aligned("bad/name", Point3::origin(), Vector3::new(1.0, 1.0, 1.0)));
    registry.push(SpatialVolume::axis_aligned("last", Point3::new(0.5, 0.5, 0.0), Vector3::new(10.0, 10.0, 10.0)));

    let report = export_all(&room(), &registry, &dir);
    assert_eq!(report.total(), 5);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, "bad/name");
    assert_eq!(report.exported.last().unwrap().id, "last");
    assert!(dir.join("last.obj").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn write_failure_for_one_volume_does_not_abort_the_batch() {
    let dir = temp_dir("write-failure");
    // A directory where the file should go makes that one write fail
    fs::create_dir_all(dir.join("right.obj")).unwrap();

    let report = export_all(&room(), &registry(), &dir);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, "right");
    assert!(report.failed[0].error.starts_with("I/O error"));

    let ids: Vec<&str> = report.exported.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["left", "nothing"]);
    assert!(dir.join("left.obj").is_file());
    assert!(dir.join("nothing.obj").is_file());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn output_dir_that_is_a_file_fails_every_volume() {
    let dir = temp_dir("not-a-dir");
    fs::create_dir_all(&dir).unwrap();
    let target = dir.join("exports");
    fs::write(&target, "occupied").unwrap();

    let report = export_all(&room(), &registry(), &target);
    assert!(report.exported.is_empty());
    assert_eq!(report.failed.len(), 3);
    for failure in &report.failed {
        assert!(failure.error.starts_with("I/O error"), "{}", failure.error);
    }
    assert_eq!(fs::read_to_string(&target).unwrap(), "occupied");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parallel_export_matches_sequential() {
    let seq_dir = temp_dir("seq");
    let par_dir = temp_dir("par");
    let source = room();
    let registry = registry();

    let sequential = export_all(&source, &registry, &seq_dir);
    let parallel = export_all_with(
        &source,
        &registry,
        &par_dir,
        &ExportOptions {
            parallel: true,
            ..ExportOptions::default()
        },
    );

    let seq_ids: Vec<&str> = sequential.exported.iter().map(|e| e.id.as_str()).collect();
    let par_ids: Vec<&str> = parallel.exported.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(seq_ids, par_ids);

    for id in seq_ids {
        let file = format!("{}.obj", id);
        assert_eq!(
            fs::read_to_string(seq_dir.join(&file)).unwrap(),
            fs::read_to_string(par_dir.join(&file)).unwrap()
        );
    }

    let _ = fs::remove_dir_all(&seq_dir);
    let _ = fs::remove_dir_all(&par_dir);
}

#[test]
fn submeshes_are_emitted_as_groups() {
    let dir = temp_dir("groups");
    let mut registry = VolumeRegistry::new();
    registry.push(SpatialVolume::axis_aligned("all", Point3::new(2.0, 0.5, 0.0), Vector3::new(5.0, 2.0, 1.0)));

    export_all(&room(), &registry, &dir);
    let text = fs::read_to_string(dir.join("all.obj")).unwrap();
    let groups: Vec<&str> = text.lines().filter(|l| l.starts_with("g ")).collect();
    assert_eq!(groups, vec!["g left", "g right"]);
    assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 4);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn ingested_volumes_drive_the_export() {
    let dir = temp_dir("ingest");
    let ingestor = Ingestor::new(IngestSettings {
        batch_scale_multiplier: 2.0,
        event_scale_multiplier: 1.0,
    });
    let mut registry = VolumeRegistry::new();

    // Half-size box doubled by the batch multiplier covers the left quad
    ingestor
        .load_batch(
            r#"[{"urlid": "batch-left", "position": [0.5, 0.5, 0], "rotation": [0, 0, 0, 1], "scale": [0.5, 0.5, 0.5]}]"#,
            &mut registry,
        )
        .unwrap();
    ingestor
        .handle_event(
            &[json!("event-right"), json!([3.5, 0.5, 0]), json!([0, 0, 0, 1]), json!([1, 1, 1])],
            &mut registry,
        )
        .unwrap();
    assert!(ingestor.handle_event(&[json!("short")], &mut registry).is_err());

    let report = export_all(&room(), &registry, &dir);
    assert!(report.is_success());
    assert_eq!(report.exported.len(), 2);
    assert_eq!(report.exported[0].triangle_count, 2);
    assert_eq!(report.exported[1].triangle_count, 2);

    let _ = fs::remove_dir_all(&dir);
}
