// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by ingestion and export
#[derive(Error, Debug)]
pub enum Error {
    #[error("Crop-box decode error: {0}")]
    Decode(#[from] roomcrop_core::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] roomcrop_geometry::Error),

    #[error("Failed to read {}: {}", .path.display(), .source)]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
