//! Focal ratio estimation.
//!
//! The focal ratio is focal length divided by sensor width. It is unitless, so
//! camera models stay comparable across sensor sizes.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::photo_metadata::common::diagnostics::Diagnostics;
use crate::photo_metadata::common::error::TagError;
use crate::photo_metadata::external::sensor_db::{SensorDatabase, sensor_key};
use crate::photo_metadata::model::types::CameraMetadata;
use crate::photo_metadata::resolve::config::ResolverConfig;
use crate::photo_metadata::tags::accessor::float_value;
use crate::photo_metadata::tags::value::{ExifTags, XmpBlock};
use crate::photo_metadata::tags::xmp_lookup::xmp_text;

pub const FOCAL_PLANE_RESOLUTION_UNIT: &str = "EXIF FocalPlaneResolutionUnit";
pub const FOCAL_PLANE_X_RESOLUTION: &str = "EXIF FocalPlaneXResolution";
pub const FOCAL_PLANE_Y_RESOLUTION: &str = "EXIF FocalPlaneYResolution";
pub const FOCAL_LENGTH_35MM: &str = "EXIF FocalLengthIn35mmFilm";
pub const FOCAL_LENGTH: &str = "EXIF FocalLength";
pub const LENS: &str = "@aux:Lens";

/// Width of a 35mm film frame (36x24mm).
const FILM_35MM_WIDTH: f64 = 36.0;

static LENS_FOCAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.]+)mm").expect("lens focal pattern is valid"));

/// Millimeters per EXIF resolution unit.
pub fn mm_per_unit(resolution_unit: f64) -> Option<f64> {
    match resolution_unit {
        u if u == 2.0 => Some(25.4), // inch
        u if u == 3.0 => Some(10.0), // cm
        u if u == 4.0 => Some(1.0),  // mm
        u if u == 5.0 => Some(0.001), // um
        _ => None,
    }
}

pub(crate) fn apply_focal_ratio<S: SensorDatabase + ?Sized>(
    mut meta: CameraMetadata,
    exif: &ExifTags,
    xmp: &[XmpBlock],
    sensors: &S,
    config: &ResolverConfig,
    diagnostics: &mut Diagnostics,
) -> CameraMetadata {
    match estimate_focal_ratio(&meta, exif, xmp, sensors, config, diagnostics) {
        Ok(ratio) => meta.focal_ratio = ratio,
        Err(error) => diagnostics.tag_decode("focal ratio", error),
    }
    debug!(focal_ratio = meta.focal_ratio, "Focal ratio resolved");
    meta
}

pub fn estimate_focal_ratio<S: SensorDatabase + ?Sized>(
    meta: &CameraMetadata,
    exif: &ExifTags,
    xmp: &[XmpBlock],
    sensors: &S,
    config: &ResolverConfig,
    diagnostics: &mut Diagnostics,
) -> Result<f64, TagError> {
    let mut sensor_width = focal_plane_sensor_width(meta.width, exif, diagnostics)?;

    let focal_35 = exif.get(FOCAL_LENGTH_35MM).map(float_value).transpose()?.flatten();
    let mut focal = exif.get(FOCAL_LENGTH).map(float_value).transpose()?.flatten();
    if focal.is_none() {
        focal = lens_focal_length(xmp)?;
    }

    if let Some(focal_35) = focal_35.filter(|&f| f > 0.0) {
        return Ok(focal_35 / FILM_35MM_WIDTH);
    }

    if sensor_width.is_none_or(|w| w == 0.0) {
        let key = sensor_key(&meta.make, &meta.model);
        sensor_width = sensors.sensor_width(&key);
        debug!(key = %key, sensor_width = ?sensor_width, "Sensor table lookup");
    }

    match (focal, sensor_width) {
        (Some(focal), Some(width)) if focal != 0.0 && width != 0.0 => Ok(focal / width),
        _ => Ok(config.default_focal_ratio),
    }
}

/// Sensor width in millimeters from the focal-plane resolution tags.
fn focal_plane_sensor_width(
    image_width: u32,
    exif: &ExifTags,
    diagnostics: &mut Diagnostics,
) -> Result<Option<f64>, TagError> {
    let (Some(unit), Some(x_resolution)) = (
        exif.get(FOCAL_PLANE_RESOLUTION_UNIT),
        exif.get(FOCAL_PLANE_X_RESOLUTION),
    ) else {
        return Ok(None);
    };

    let Some(unit) = float_value(unit)? else {
        return Ok(None);
    };
    let Some(mm_per_unit) = mm_per_unit(unit) else {
        diagnostics.tag_decode(FOCAL_PLANE_RESOLUTION_UNIT, TagError::UnknownResolutionUnit(unit));
        return Ok(None);
    };

    let mut pixels_per_unit = float_value(x_resolution)?.unwrap_or(0.0);
    if pixels_per_unit <= 0.0 {
        if let Some(y_resolution) = exif.get(FOCAL_PLANE_Y_RESOLUTION) {
            pixels_per_unit = float_value(y_resolution)?.unwrap_or(0.0);
        }
    }

    if pixels_per_unit > 0.0 {
        Ok(Some(image_width as f64 / pixels_per_unit * mm_per_unit))
    } else {
        Ok(None)
    }
}

/// Focal length parsed from a lens description such as `"4.5mm f/2.8"`.
fn lens_focal_length(xmp: &[XmpBlock]) -> Result<Option<f64>, TagError> {
    let Some(lens) = xmp.iter().find_map(|block| xmp_text(block, &[LENS]).map(|(_, text)| text)) else {
        return Ok(None);
    };
    let Some(captures) = LENS_FOCAL.captures(&lens) else {
        return Ok(None);
    };
    captures[1]
        .parse::<f64>()
        .map(Some)
        .map_err(|_| TagError::NotNumeric(captures[1].to_string()))
}
