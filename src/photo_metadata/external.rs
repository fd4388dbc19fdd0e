//! External collaborators
//!
//! Everything the resolver needs from outside its own computation sits behind
//! one of these traits. Concrete adapters are provided for the common cases.

pub mod probe;
pub mod tiff_probe;
pub mod sensor_db;
pub mod geodetic;
pub mod tag_source;

pub use probe::{ExtensionProbe, ImageHeaderProbe, ImageSizeProbe, RawLoaderProbe};
pub use tiff_probe::TiffSizeProbe;
pub use sensor_db::{SensorDatabase, SensorTable, sensor_key};
pub use geodetic::{GeodeticConverter, Wgs84};
pub use tag_source::{JsonTagSource, TagDump, TagSource};
