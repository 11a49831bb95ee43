// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # RoomCrop Core
//!
//! Decoding of the inputs a crop pass consumes:
//!
//! - **Crop-box definitions**: batch JSON lists and positional incremental
//!   events, both decoded into [`CropBoxRecord`]
//! - **Room meshes**: a [nom](https://docs.rs/nom) based Wavefront OBJ parser
//!   producing flat position/index buffers with named groups
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roomcrop_core::{decode_cropbox_list, parse_obj};
//!
//! let boxes = decode_cropbox_list(r#"[{"urlid":"a","position":[0,0,0],"rotation":[0,0,0,1],"scale":[1,1,1]}]"#)?;
//! let room = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")?;
//! assert_eq!(room.triangle_count(), 1);
//! ```

pub mod cropbox;
pub mod error;
pub mod obj;

pub use cropbox::{decode_cropbox_list, CropBoxRecord, EVENT_FIELD_COUNT};
pub use error::{Error, Result};
pub use obj::{parse_obj, ObjData, ObjGroup};
