//! RoomCrop Geometry
//!
//! Crops a room mesh to crop volumes and serializes the result as OBJ,
//! using nalgebra for transforms.

pub mod crop;
pub mod error;
pub mod mesh;
pub mod normals;
pub mod obj;
pub mod transform;
pub mod volume;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};

pub use crop::{crop, crop_with, CropOptions};
pub use error::{Error, Result};
pub use mesh::{Mesh, SourceMesh, SubMesh};
pub use normals::calculate_normals;
pub use obj::{save_obj, to_obj_string, validate_export_name, write_obj};
pub use transform::Transform;
pub use volume::{ContainmentMode, SpatialVolume};
