//! Read-only views computed from a resolved [`CameraMetadata`].
//!
//! [`CameraMetadata`]: crate::photo_metadata::model::CameraMetadata

pub mod identity;
pub mod radiometry;
pub mod irradiance;
pub mod export;

pub use identity::CaptureId;
pub use export::{ExportView, GpsRecord, OpkRecord};
