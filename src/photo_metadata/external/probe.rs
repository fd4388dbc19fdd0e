//! Image pixel-dimension probing.

use std::path::Path;

use tracing::debug;

use crate::photo_metadata::common::error::{MetadataError, Result};
use crate::photo_metadata::external::tiff_probe::TiffSizeProbe;

pub trait ImageSizeProbe {
    /// `(width, height)` in pixels. Any failure is a [`MetadataError::CorruptedSource`].
    fn probe(&self, path: &Path) -> Result<(u32, u32)>;
}

/// JPEG/PNG header probe backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageHeaderProbe;

impl ImageSizeProbe for ImageHeaderProbe {
    fn probe(&self, path: &Path) -> Result<(u32, u32)> {
        image::image_dimensions(path)
            .map_err(|e| MetadataError::CorruptedSource(format!("{}: {}", path.display(), e)))
    }
}

/// Camera RAW probe backed by `rawloader`.
///
/// Decodes the full sensor buffer, so only use it for formats nothing else reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawLoaderProbe;

impl ImageSizeProbe for RawLoaderProbe {
    fn probe(&self, path: &Path) -> Result<(u32, u32)> {
        let decoded = rawloader::decode_file(path)
            .map_err(|e| MetadataError::CorruptedSource(format!("{}: {}", path.display(), e)))?;

        let width = u32::try_from(decoded.width)
            .map_err(|_| MetadataError::CorruptedSource(format!("{}: width overflow", path.display())))?;
        let height = u32::try_from(decoded.height)
            .map_err(|_| MetadataError::CorruptedSource(format!("{}: height overflow", path.display())))?;
        Ok((width, height))
    }
}

/// Picks a probe from the file extension: TIFF, then JPEG/PNG, then RAW.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionProbe;

impl ImageSizeProbe for ExtensionProbe {
    fn probe(&self, path: &Path) -> Result<(u32, u32)> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        debug!("Probing {} by extension {:?}", path.display(), extension);

        match extension.as_str() {
            "tif" | "tiff" => TiffSizeProbe.probe(path),
            "jpg" | "jpeg" | "png" => ImageHeaderProbe.probe(path),
            _ => RawLoaderProbe.probe(path),
        }
    }
}
