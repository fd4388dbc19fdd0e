//! Camera metadata model
//!
//! The canonical per-photo entity and the small value types around it.

pub mod projection;
pub mod quirk;
pub mod types;

pub use projection::{ParseProjectionError, Projection};
pub use quirk::CameraQuirk;
pub use types::{
    CameraMetadata,
    CaptureSettings,
    GeoEntry,
    Geolocation,
    Pose,
    Radiometry,
    VendorBlobs,
};
