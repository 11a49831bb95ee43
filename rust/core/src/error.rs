// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for decoding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding crop boxes or parsing OBJ text
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid crop-box JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Crop-box event has {found} values, expected at least {expected}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Crop-box event field {index} ({name}): {reason}")]
    InvalidField {
        index: usize,
        name: &'static str,
        reason: String,
    },

    #[error("OBJ parse error at line {line}: {message}")]
    ObjParse { line: usize, message: String },

    #[error("OBJ face at line {line} references {kind} {index}, but only {count} are defined")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
        count: usize,
    },
}

impl Error {
    /// Create an OBJ parse error for a 1-based line number
    pub fn obj(line: usize, message: impl Into<String>) -> Self {
        Error::ObjParse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn field(index: usize, name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            index,
            name,
            reason: reason.into(),
        }
    }
}
