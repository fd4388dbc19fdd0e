//! Tag readers.
//!
//! Binary container parsing lives elsewhere; the resolver only needs the
//! decoded EXIF map and the XMP description blocks for a path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::photo_metadata::common::error::{MetadataError, Result};
use crate::photo_metadata::tags::value::{ExifTags, XmpBlock};

pub trait TagSource {
    fn read_exif(&self, path: &Path) -> Result<ExifTags>;
    fn read_xmp(&self, path: &Path) -> Result<Vec<XmpBlock>>;

    /// Both tag sets for one image. Sources that decode EXIF and XMP from the
    /// same container override this to read it once.
    fn read_tags(&self, path: &Path) -> (Result<ExifTags>, Result<Vec<XmpBlock>>) {
        (self.read_exif(path), self.read_xmp(path))
    }
}

/// On-disk form of a tag dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagDump {
    #[serde(default)]
    pub exif: ExifTags,
    #[serde(default)]
    pub xmp: Vec<XmpBlock>,
}

/// Reads tags from a JSON sidecar next to the image (`photo.jpg.json`).
#[derive(Debug, Clone)]
pub struct JsonTagSource {
    suffix: String,
}

impl Default for JsonTagSource {
    fn default() -> Self {
        Self {
            suffix: ".json".to_string(),
        }
    }
}

impl JsonTagSource {
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    pub fn sidecar_path(&self, image: &Path) -> PathBuf {
        let mut sidecar = OsString::from(image.as_os_str());
        sidecar.push(&self.suffix);
        PathBuf::from(sidecar)
    }

    pub fn read_dump(&self, image: &Path) -> Result<TagDump> {
        let sidecar = self.sidecar_path(image);
        debug!("Reading tag dump {}", sidecar.display());

        let json = std::fs::read_to_string(&sidecar).map_err(|e| {
            MetadataError::TagReadError(format!("{}: {}", sidecar.display(), e))
        })?;
        serde_json::from_str(&json)
            .map_err(|e| MetadataError::TagReadError(format!("{}: {}", sidecar.display(), e)))
    }
}

impl TagSource for JsonTagSource {
    fn read_exif(&self, path: &Path) -> Result<ExifTags> {
        Ok(self.read_dump(path)?.exif)
    }

    fn read_xmp(&self, path: &Path) -> Result<Vec<XmpBlock>> {
        Ok(self.read_dump(path)?.xmp)
    }

    fn read_tags(&self, path: &Path) -> (Result<ExifTags>, Result<Vec<XmpBlock>>) {
        match self.read_dump(path) {
            Ok(dump) => (Ok(dump.exif), Ok(dump.xmp)),
            Err(e) => {
                let reason = e.to_string();
                (Err(e), Err(MetadataError::TagReadError(reason)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo_metadata::tags::value::{ExifValue, XmpValue};

    #[test]
    fn test_sidecar_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("IMG_0001.JPG");
        std::fs::write(
            dir.path().join("IMG_0001.JPG.json"),
            r#"{
                "exif": {"Image Make": {"ascii": "DJI"}},
                "xmp": [{"@drone-dji:GimbalPitchDegree": "-90.0"}]
            }"#,
        )
        .unwrap();

        let source = JsonTagSource::default();
        let exif = source.read_exif(&image).unwrap();
        let xmp = source.read_xmp(&image).unwrap();

        assert_eq!(exif["Image Make"], ExifValue::ascii("DJI"));
        assert_eq!(xmp.len(), 1);
        assert_eq!(xmp[0]["@drone-dji:GimbalPitchDegree"], XmpValue::text("-90.0"));
    }

    #[test]
    fn test_read_tags_from_one_dump() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("IMG_0002.TIF");
        std::fs::write(
            dir.path().join("IMG_0002.TIF.json"),
            r#"{"exif": {"Image Model": {"ascii": "Sequoia"}}, "xmp": [{"Camera:BandName": "NIR"}, {}]}"#,
        )
        .unwrap();

        let (exif, xmp) = JsonTagSource::default().read_tags(&image);
        assert_eq!(exif.unwrap()["Image Model"], ExifValue::ascii("Sequoia"));
        assert_eq!(xmp.unwrap().len(), 2);
    }

    #[test]
    fn test_read_tags_missing_sidecar_fails_both() {
        let (exif, xmp) = JsonTagSource::default().read_tags(Path::new("/nonexistent/b.jpg"));
        assert!(matches!(exif, Err(MetadataError::TagReadError(_))));
        assert!(matches!(xmp, Err(MetadataError::TagReadError(_))));
    }

    #[test]
    fn test_missing_sidecar() {
        let source = JsonTagSource::default();
        assert!(matches!(
            source.read_exif(Path::new("/nonexistent/a.jpg")),
            Err(MetadataError::TagReadError(_))
        ));
    }
}
