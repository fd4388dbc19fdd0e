//! Common utilities module
//!
//! Error types and the non-fatal diagnostics carried alongside resolved values.

pub mod error;
pub mod diagnostics;

pub use error::{GeometryError, MetadataError, Result, TagError};
pub use diagnostics::{Diagnostics, Notice, Resolved};
