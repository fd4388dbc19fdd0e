//! Camera metadata normalization for photogrammetry inputs.
//!
//! Raw EXIF and XMP tag maps go in; a [`CameraMetadata`] with unit-consistent
//! camera, radiometry and exterior-orientation fields comes out.

pub mod logger;
pub mod photo_metadata;

pub use photo_metadata::{
    CameraMetadata,
    MetadataError,
    MetadataResolver,
    ResolverConfig,
    Result,
};
