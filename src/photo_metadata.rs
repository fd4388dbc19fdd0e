//! Photo metadata resolution module
//!
//! Raw tag maps are turned into a [`CameraMetadata`] by a fixed sequence of
//! resolver stages, with external collaborators (size probing, sensor lookup,
//! geodetic conversion, tag reading) kept behind traits.

pub mod common;
pub mod tags;
pub mod model;
pub mod external;
pub mod resolve;
pub mod query;
pub mod collection;

pub use common::{
    Diagnostics,
    GeometryError,
    MetadataError,
    Notice,
    Resolved,
    Result,
    TagError,
};

pub use tags::{
    ExifTags,
    ExifValue,
    Rational,
    XmpBlock,
    XmpValue,
};

pub use model::{
    CameraMetadata,
    CameraQuirk,
    CaptureSettings,
    GeoEntry,
    Geolocation,
    Pose,
    Projection,
    Radiometry,
    VendorBlobs,
};

pub use external::{
    ExtensionProbe,
    GeodeticConverter,
    ImageHeaderProbe,
    ImageSizeProbe,
    JsonTagSource,
    RawLoaderProbe,
    SensorDatabase,
    SensorTable,
    TagSource,
    TiffSizeProbe,
    Wgs84,
};

pub use resolve::{
    MetadataResolver,
    ResolverConfig,
    ResolverConfigBuilder,
};

pub use query::{
    CaptureId,
    ExportView,
};

pub use collection::{
    largest_dimension,
    largest_dimensions,
    largest_photo,
};
