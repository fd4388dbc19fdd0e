//! Resolver stages
//!
//! Each stage takes the metadata produced by the previous one plus raw inputs
//! and returns an updated snapshot, recording non-fatal problems in a shared
//! [`Diagnostics`](crate::photo_metadata::Diagnostics).

mod config;
pub mod exif;
pub mod xmp;
mod finalize;
pub mod focal;
pub mod orientation;
mod pipeline;


pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use focal::mm_per_unit;
pub use orientation::{Opk, ypr_to_opk};
pub use pipeline::MetadataResolver;
