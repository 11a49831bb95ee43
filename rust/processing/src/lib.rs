// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared crop pipeline used by the server: the crop volume registry, the
//! batch and incremental ingestion routes, and batch OBJ export.

pub mod error;
pub mod export;
pub mod ingest;
pub mod registry;

pub use error::{Error, Result};
pub use export::{
    export_all, export_all_with, export_volume, ExportFailure, ExportOptions, ExportReport,
    ExportedVolume,
};
pub use ingest::{IngestSettings, Ingestor, DEFAULT_BATCH_SCALE_MULTIPLIER, DEFAULT_EVENT_SCALE_MULTIPLIER};
pub use registry::VolumeRegistry;
