use crate::photo_metadata::common::diagnostics::Diagnostics;
use crate::photo_metadata::common::error::TagError;
use crate::photo_metadata::model::quirk::CameraQuirk;
use crate::photo_metadata::model::types::CameraMetadata;

/// Runs once after every tag resolver: band name sanitization, the
/// latitude/longitude pairing invariant and quirk detection.
pub(crate) fn finalize(mut meta: CameraMetadata, diagnostics: &mut Diagnostics) -> CameraMetadata {
    // Band names end up in folder paths
    meta.band_name.retain(|c| c.is_ascii_alphanumeric());

    if meta.geo.latitude.is_some() != meta.geo.longitude.is_some() {
        diagnostics.tag_decode("GPS", TagError::IncompletePosition);
        meta.geo.latitude = None;
        meta.geo.longitude = None;
    }

    meta.quirk = CameraQuirk::detect(&meta.make, &meta.model);
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_name_sanitized() {
        let mut meta = CameraMetadata::new("a.tif", 10, 10).unwrap();
        meta.band_name = "Red-Edge_1 (α)".to_string();
        let meta = finalize(meta, &mut Diagnostics::new());
        assert_eq!(meta.band_name(), "RedEdge1");
    }

    #[test]
    fn test_lone_latitude_cleared() {
        let mut meta = CameraMetadata::new("a.tif", 10, 10).unwrap();
        meta.geo.latitude = Some(46.0);
        let mut diagnostics = Diagnostics::new();
        let meta = finalize(meta, &mut diagnostics);
        assert_eq!(meta.geolocation().latitude, None);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_quirk_detected() {
        let mut meta = CameraMetadata::new("a.tif", 10, 10).unwrap();
        meta.make = "Parrot".to_string();
        meta.model = "Sequoia".to_string();
        let meta = finalize(meta, &mut Diagnostics::new());
        assert_eq!(meta.quirk(), CameraQuirk::Sequoia);
    }
}
