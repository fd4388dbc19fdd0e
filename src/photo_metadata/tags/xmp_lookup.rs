//! Typed lookups over an XMP description block.
//!
//! Each field is read through an ordered list of synonymous tag names; the
//! first one present wins. Lookups return the matching tag name with the
//! parsed value so callers can attribute failures.

use crate::photo_metadata::common::error::TagError;
use crate::photo_metadata::tags::accessor::parse_text_f64;
use crate::photo_metadata::tags::value::{XmpBlock, XmpValue};

/// First candidate present in the block, skipping empty sequences.
pub fn xmp_value<'b, 'c>(block: &'b XmpBlock, candidates: &[&'c str]) -> Option<(&'c str, &'b XmpValue)> {
    candidates.iter().find_map(|&tag| {
        block
            .get(tag)
            .filter(|value| !matches!(value, XmpValue::Seq(items) if items.is_empty()))
            .map(|value| (tag, value))
    })
}

pub fn xmp_text<'c>(block: &XmpBlock, candidates: &[&'c str]) -> Option<(&'c str, String)> {
    xmp_value(block, candidates).and_then(|(tag, value)| value.as_text().map(|text| (tag, text)))
}

pub fn xmp_f64<'c>(block: &XmpBlock, candidates: &[&'c str]) -> Option<(&'c str, Result<f64, TagError>)> {
    xmp_value(block, candidates).map(|(tag, value)| {
        let parsed = match value {
            XmpValue::Integer(v) => Ok(*v as f64),
            XmpValue::Float(v) => Ok(*v),
            other => other
                .as_text()
                .ok_or(TagError::NotText)
                .and_then(|text| parse_text_f64(&text)),
        };
        (tag, parsed)
    })
}

pub fn xmp_i64<'c>(block: &XmpBlock, candidates: &[&'c str]) -> Option<(&'c str, Result<i64, TagError>)> {
    xmp_value(block, candidates).map(|(tag, value)| {
        let parsed = match value {
            XmpValue::Integer(v) => Ok(*v),
            XmpValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Ok(*v as i64),
            XmpValue::Float(v) => Err(TagError::NotNumeric(v.to_string())),
            other => other.as_text().ok_or(TagError::NotText).and_then(|text| {
                text.trim()
                    .parse::<i64>()
                    .map_err(|_| TagError::NotNumeric(text.clone()))
            }),
        };
        (tag, parsed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(entries: &[(&str, XmpValue)]) -> XmpBlock {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_first_candidate_wins() {
        let xmp = block(&[
            ("@Camera:RigCameraIndex", XmpValue::text("2")),
            ("Camera:RigCameraIndex", XmpValue::text("5")),
        ]);
        let candidates = ["DLS:SensorId", "@Camera:RigCameraIndex", "Camera:RigCameraIndex"];

        let (tag, value) = xmp_i64(&xmp, &candidates).unwrap();
        assert_eq!(tag, "@Camera:RigCameraIndex");
        assert_eq!(value, Ok(2));
    }

    #[test]
    fn test_empty_seq_falls_through() {
        let xmp = block(&[
            ("Camera:VignettingCenter", XmpValue::Seq(Vec::new())),
            ("Sentera:VignettingCenter", XmpValue::seq(["10", "20"])),
        ]);
        let (tag, text) = xmp_text(&xmp, &["Camera:VignettingCenter", "Sentera:VignettingCenter"]).unwrap();
        assert_eq!(tag, "Sentera:VignettingCenter");
        assert_eq!(text, "10 20");
    }

    #[test]
    fn test_fraction_cast() {
        let xmp = block(&[
            ("Camera:Irradiance", XmpValue::text("1/50")),
            ("Camera:SunSensor", XmpValue::text("abc")),
        ]);
        assert_eq!(xmp_f64(&xmp, &["Camera:Irradiance"]).unwrap().1, Ok(0.02));
        assert!(matches!(
            xmp_f64(&xmp, &["Camera:SunSensor"]).unwrap().1,
            Err(TagError::NotNumeric(_))
        ));
        assert!(xmp_f64(&xmp, &["Camera:Yaw"]).is_none());
    }
}
