use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::photo_metadata::common::error::{MetadataError, Result};
use crate::photo_metadata::external::probe::ImageSizeProbe;

/// Reads dimensions from the first TIFF IFD without decoding pixels.
///
/// Multispectral rigs (Sequoia, MicaSense, Sentera) write one TIFF per band.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffSizeProbe;

impl ImageSizeProbe for TiffSizeProbe {
    fn probe(&self, path: &Path) -> Result<(u32, u32)> {
        let file = File::open(path).map_err(|e| corrupted(path, e))?;
        let mut decoder = tiff::decoder::Decoder::new(BufReader::new(file))
            .map_err(|e| corrupted(path, e))?;
        let (width, height) = decoder.dimensions().map_err(|e| corrupted(path, e))?;

        debug!("TIFF dimensions: {}x{}", width, height);
        Ok((width, height))
    }
}

fn corrupted(path: &Path, error: impl std::fmt::Display) -> MetadataError {
    MetadataError::CorruptedSource(format!("{}: {}", path.display(), error))
}
