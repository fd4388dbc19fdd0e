//! Standard EXIF fields.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::photo_metadata::common::diagnostics::Diagnostics;
use crate::photo_metadata::common::error::TagError;
use crate::photo_metadata::model::types::CameraMetadata;
use crate::photo_metadata::resolve::config::ResolverConfig;
use crate::photo_metadata::tags::accessor::{exif_dms_to_decimal, float_value, int_value, list_values};
use crate::photo_metadata::tags::value::{ExifTags, ExifValue};

pub const MAKE: &str = "Image Make";
pub const MODEL: &str = "Image Model";
pub const GPS_ALTITUDE: &str = "GPS GPSAltitude";
pub const GPS_ALTITUDE_REF: &str = "GPS GPSAltitudeRef";
pub const GPS_LATITUDE: &str = "GPS GPSLatitude";
pub const GPS_LATITUDE_REF: &str = "GPS GPSLatitudeRef";
pub const GPS_LONGITUDE: &str = "GPS GPSLongitude";
pub const GPS_LONGITUDE_REF: &str = "GPS GPSLongitudeRef";
pub const ORIENTATION: &str = "Image Orientation";
pub const VENDOR_BLACK_LEVEL: &str = "Image Tag 0xC61A";
pub const BLACK_LEVEL: &str = "BlackLevel";
pub const EXPOSURE_TIME: &str = "EXIF ExposureTime";
pub const FNUMBER: &str = "EXIF FNumber";
pub const ISO_TAGS: [&str; 3] = ["EXIF ISOSpeed", "EXIF PhotographicSensitivity", "EXIF ISOSpeedRatings"];
pub const BITS_PER_SAMPLE: &str = "Image BitsPerSample";
pub const DATE_TIME_ORIGINAL: &str = "EXIF DateTimeOriginal";
pub const SUB_SEC_TIME: &str = "EXIF SubSecTime";

const DATE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

pub fn resolve_exif(
    mut meta: CameraMetadata,
    tags: &ExifTags,
    config: &ResolverConfig,
    diagnostics: &mut Diagnostics,
) -> CameraMetadata {
    if let Some(make) = read_identity(tags, MAKE, diagnostics) {
        meta.make = make;
    }
    if let Some(model) = read_identity(tags, MODEL, diagnostics) {
        meta.model = model;
    }

    if let Some(value) = tags.get(GPS_ALTITUDE) {
        if let Some(altitude) = diagnostics.capture(GPS_ALTITUDE, float_value(value)).flatten() {
            let below_sea_level = tags
                .get(GPS_ALTITUDE_REF)
                .and_then(|r| diagnostics.capture(GPS_ALTITUDE_REF, int_value(r)))
                .flatten()
                .is_some_and(|r| r > 0);
            meta.geo.altitude = Some(if below_sea_level { -altitude } else { altitude });
        }
    }

    if let (Some(dms), Some(reference)) = (tags.get(GPS_LATITUDE), tags.get(GPS_LATITUDE_REF)) {
        meta.geo.latitude = diagnostics.capture(GPS_LATITUDE, exif_dms_to_decimal(dms, reference)).flatten();
    }
    if let (Some(dms), Some(reference)) = (tags.get(GPS_LONGITUDE), tags.get(GPS_LONGITUDE_REF)) {
        meta.geo.longitude = diagnostics.capture(GPS_LONGITUDE, exif_dms_to_decimal(dms, reference)).flatten();
    }

    if let Some(value) = tags.get(ORIENTATION) {
        let orientation = int_value(value).and_then(|code| match code {
            Some(code) => u16::try_from(code)
                .map(Some)
                .map_err(|_| TagError::OutOfRange(code.to_string())),
            None => Ok(None),
        });
        if let Some(orientation) = diagnostics.capture(ORIENTATION, orientation).flatten() {
            meta.orientation = orientation;
        }
    }

    if let Some(value) = tags.get(VENDOR_BLACK_LEVEL).or_else(|| tags.get(BLACK_LEVEL)) {
        meta.radiometry.black_level = Some(list_values(value));
    }

    if let Some(value) = tags.get(EXPOSURE_TIME) {
        meta.capture.exposure_time = diagnostics.capture(EXPOSURE_TIME, float_value(value)).flatten();
    }
    if let Some(value) = tags.get(FNUMBER) {
        meta.capture.fnumber = diagnostics.capture(FNUMBER, float_value(value)).flatten();
    }
    if let Some((tag, value)) = ISO_TAGS.iter().find_map(|&tag| tags.get(tag).map(|v| (tag, v))) {
        meta.capture.iso_speed = diagnostics.capture(tag, int_value(value)).flatten();
    }
    if let Some(value) = tags.get(BITS_PER_SAMPLE) {
        meta.capture.bits_per_sample = diagnostics.capture(BITS_PER_SAMPLE, int_value(value)).flatten();
    }

    if let Some(value) = tags.get(DATE_TIME_ORIGINAL) {
        let sub_seconds = tags
            .get(SUB_SEC_TIME)
            .and_then(|v| diagnostics.capture(SUB_SEC_TIME, int_value(v)))
            .flatten()
            .unwrap_or(0);
        meta.capture.utc_time_ms = diagnostics.capture(DATE_TIME_ORIGINAL, utc_millis(value, sub_seconds));
    }

    if config.warn_null_island && meta.geo.latitude == Some(0.0) && meta.geo.longitude == Some(0.0) {
        diagnostics.suspicious(format!("{} has GPS position (0,0), possibly corrupted", meta.filename));
    }

    debug!(
        make = %meta.make,
        model = %meta.model,
        has_geo = meta.has_geo(),
        "EXIF resolved"
    );
    meta
}

/// Make/model text. Undecodable text is replaced by `"unknown"`.
fn read_identity(tags: &ExifTags, tag: &str, diagnostics: &mut Diagnostics) -> Option<String> {
    let value = tags.get(tag)?;
    match value.text() {
        Ok(text) => Some(text.trim().to_string()),
        Err(error) => {
            diagnostics.tag_decode(tag, error);
            Some("unknown".to_string())
        }
    }
}

/// Capture time in UTC milliseconds. The sub-second tag holds the decimal
/// digits after the point; its sign is carried separately.
pub fn utc_millis(date_time: &ExifValue, sub_seconds: i64) -> Result<f64, TagError> {
    let text = date_time.text()?;
    let text = text.trim().trim_end_matches('\0');
    let parsed = NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .map_err(|_| TagError::InvalidDateTime(text.to_string()))?;

    let sign = if sub_seconds < 0 { -1.0 } else { 1.0 };
    let fraction: f64 = format!("0.{}", sub_seconds.unsigned_abs())
        .parse()
        .map_err(|_| TagError::NotNumeric(sub_seconds.to_string()))?;

    Ok(parsed.and_utc().timestamp_millis() as f64 + sign * fraction * 1e3)
}
