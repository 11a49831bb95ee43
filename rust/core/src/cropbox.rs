// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Crop-box definitions
//!
//! Two wire shapes carry the same record:
//!
//! - a batch list, one JSON object per crop box:
//!   `[{"urlid": "a", "position": [x,y,z], "rotation": [x,y,z,w], "scale": [x,y,z]}]`
//! - an incremental event, a positional value list:
//!   `["a", [x,y,z], [x,y,z,w], [x,y,z]]`

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of values an incremental event must carry
pub const EVENT_FIELD_COUNT: usize = 4;

/// A decoded crop-box definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropBoxRecord {
    /// Identifier, also used as the export file stem
    pub urlid: String,
    /// World-space center
    pub position: [f32; 3],
    /// Orientation quaternion (x, y, z, w)
    pub rotation: [f32; 4],
    /// World-space box size
    pub scale: [f32; 3],
}

impl CropBoxRecord {
    /// Decode an incremental event `[urlid, position, rotation, scale]`.
    ///
    /// Values past the fourth are ignored.
    pub fn from_event(values: &[Value]) -> Result<Self> {
        if values.len() < EVENT_FIELD_COUNT {
            return Err(Error::TooFewFields {
                expected: EVENT_FIELD_COUNT,
                found: values.len(),
            });
        }

        let urlid = identifier(&values[0])?;
        let position = components::<3>(&values[1], 1, "position")?;
        let rotation = components::<4>(&values[2], 2, "rotation")?;
        let scale = components::<3>(&values[3], 3, "scale")?;

        Ok(Self {
            urlid,
            position,
            rotation,
            scale,
        })
    }
}

/// Decode a batch list of crop-box definitions
pub fn decode_cropbox_list(json: &str) -> Result<Vec<CropBoxRecord>> {
    Ok(serde_json::from_str(json)?)
}

fn identifier(value: &Value) -> Result<String> {
    let id = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            return Err(Error::field(
                0,
                "urlid",
                format!("expected a scalar, found {}", kind(other)),
            ))
        }
    };

    if id.is_empty() {
        return Err(Error::field(0, "urlid", "identifier is empty"));
    }
    Ok(id)
}

fn components<const N: usize>(value: &Value, index: usize, name: &'static str) -> Result<[f32; N]> {
    let items = value.as_array().ok_or_else(|| {
        Error::field(index, name, format!("expected an array, found {}", kind(value)))
    })?;

    if items.len() != N {
        return Err(Error::field(
            index,
            name,
            format!("expected {} components, found {}", N, items.len()),
        ));
    }

    let mut out = [0.0f32; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64().ok_or_else(|| {
            Error::field(index, name, format!("component is {}, not a number", kind(item)))
        })? as f32;
    }
    Ok(out)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_list() {
        let json = r#"[
            {"urlid": "chair", "position": [1.0, 0.5, -2.0], "rotation": [0, 0, 0, 1], "scale": [0.4, 0.9, 0.4]},
            {"urlid": "lamp", "position": [0, 2, 0], "rotation": [0, 0.7071, 0, 0.7071], "scale": [1, 1, 1]}
        ]"#;
        let records = decode_cropbox_list(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].urlid, "chair");
        assert_eq!(records[0].position, [1.0, 0.5, -2.0]);
        assert_eq!(records[1].rotation, [0.0, 0.7071, 0.0, 0.7071]);
    }

    #[test]
    fn test_decode_list_rejects_short_vectors() {
        let json = r#"[{"urlid": "x", "position": [1, 2], "rotation": [0, 0, 0, 1], "scale": [1, 1, 1]}]"#;
        assert!(matches!(decode_cropbox_list(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_event() {
        let values = vec![
            json!("table"),
            json!([1.0, 2.0, 3.0]),
            json!([0.0, 0.0, 0.0, 1.0]),
            json!([2.0, 1.0, 2.0]),
        ];
        let record = CropBoxRecord::from_event(&values).unwrap();
        assert_eq!(record.urlid, "table");
        assert_eq!(record.position, [1.0, 2.0, 3.0]);
        assert_eq!(record.rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(record.scale, [2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_event_numeric_identifier() {
        let values = vec![json!(42), json!([0, 0, 0]), json!([0, 0, 0, 1]), json!([1, 1, 1])];
        assert_eq!(CropBoxRecord::from_event(&values).unwrap().urlid, "42");
    }

    #[test]
    fn test_event_too_few_fields() {
        let values = vec![json!("table"), json!([1.0, 2.0, 3.0]), json!([0, 0, 0, 1])];
        match CropBoxRecord::from_event(&values) {
            Err(Error::TooFewFields { expected, found }) => {
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("Expected TooFewFields, got {:?}", other),
        }
    }

    #[test]
    fn test_event_wrong_types() {
        let values = vec![json!("table"), json!("not a vector"), json!([0, 0, 0, 1]), json!([1, 1, 1])];
        match CropBoxRecord::from_event(&values) {
            Err(Error::InvalidField { index, name, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(name, "position");
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }

        let values = vec![json!("table"), json!([0, 0, 0]), json!([0, 0, 1]), json!([1, 1, 1])];
        assert!(matches!(
            CropBoxRecord::from_event(&values),
            Err(Error::InvalidField { index: 2, .. })
        ));

        let values = vec![json!(null), json!([0, 0, 0]), json!([0, 0, 0, 1]), json!([1, 1, 1])];
        assert!(matches!(
            CropBoxRecord::from_event(&values),
            Err(Error::InvalidField { index: 0, .. })
        ));
    }
}
