//! Typed extraction helpers over raw EXIF values.

use crate::photo_metadata::common::error::TagError;
use crate::photo_metadata::tags::value::ExifValue;

/// Every element as a float. Zero-denominator rationals become `None` instead of
/// failing the whole tag.
pub fn float_values(value: &ExifValue) -> Result<Vec<Option<f64>>, TagError> {
    match value {
        ExifValue::Integers(values) => Ok(values.iter().map(|&v| Some(v as f64)).collect()),
        ExifValue::Rationals(values) => Ok(values.iter().map(|r| r.to_f64()).collect()),
        ExifValue::Floats(values) => Ok(values.iter().map(|&v| Some(v)).collect()),
        ExifValue::Ascii(text) => parse_text_f64(text).map(|v| vec![Some(v)]),
        ExifValue::Bytes(_) => Err(TagError::NotNumeric("<bytes>".to_string())),
    }
}

/// First element as a float; `None` when the list is empty or the first
/// rational is degenerate.
pub fn float_value(value: &ExifValue) -> Result<Option<f64>, TagError> {
    Ok(float_values(value)?.into_iter().next().flatten())
}

/// Every element truncated to an integer.
pub fn int_values(value: &ExifValue) -> Result<Vec<i64>, TagError> {
    match value {
        ExifValue::Integers(values) => Ok(values.clone()),
        ExifValue::Rationals(values) => values
            .iter()
            .map(|r| {
                if r.den == 0 {
                    Err(TagError::ZeroDenominator)
                } else {
                    Ok(r.num / r.den)
                }
            })
            .collect(),
        ExifValue::Floats(values) => values.iter().map(|&v| truncate_f64(v)).collect(),
        ExifValue::Ascii(text) => text
            .trim()
            .trim_end_matches('\0')
            .parse::<i64>()
            .map(|v| vec![v])
            .map_err(|_| TagError::NotNumeric(text.clone())),
        ExifValue::Bytes(_) => Err(TagError::NotNumeric("<bytes>".to_string())),
    }
}

pub fn int_value(value: &ExifValue) -> Result<Option<i64>, TagError> {
    Ok(int_values(value)?.into_iter().next())
}

/// Space-separated rendering of every element, the storage form of list-valued
/// tags like the black level.
pub fn list_values(value: &ExifValue) -> String {
    match value {
        ExifValue::Ascii(text) => text.clone(),
        ExifValue::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ExifValue::Integers(values) => join(values.iter().map(|v| v.to_string())),
        ExifValue::Floats(values) => join(values.iter().map(|v| v.to_string())),
        ExifValue::Rationals(values) => join(values.iter().map(|r| match r.den {
            1 => r.num.to_string(),
            _ => r.to_f64().map(|v| v.to_string()).unwrap_or_else(|| format!("{}/{}", r.num, r.den)),
        })),
    }
}

/// Degrees/minutes/seconds to signed decimal degrees.
///
/// Southern and western references are negative. Any absent component makes
/// the whole result absent.
pub fn dms_to_decimal(dms: &[Option<f64>], reference: &str) -> Result<Option<f64>, TagError> {
    let [degrees, minutes, seconds] = dms else {
        return Err(TagError::ComponentCount { expected: 3, found: dms.len() });
    };
    let hemisphere = reference
        .trim()
        .chars()
        .next()
        .ok_or_else(|| TagError::InvalidReference(reference.to_string()))?;

    let (Some(degrees), Some(minutes), Some(seconds)) = (*degrees, *minutes, *seconds) else {
        return Ok(None);
    };

    let sign = if "SWsw".contains(hemisphere) { -1.0 } else { 1.0 };
    Ok(Some(sign * (degrees + minutes / 60.0 + seconds / 3600.0)))
}

pub fn exif_dms_to_decimal(dms: &ExifValue, reference: &ExifValue) -> Result<Option<f64>, TagError> {
    dms_to_decimal(&float_values(dms)?, &reference.text()?)
}

/// Outcome of reading an `"A/B"` string.
#[derive(Debug, Clone, PartialEq)]
pub enum Fraction {
    Value(f64),
    /// Not a usable fraction; the original text, unchanged.
    Unparsed(String),
}

pub fn try_parse_fraction(text: &str) -> Fraction {
    let parts: Vec<&str> = text.split('/').collect();
    if let [num, den] = parts.as_slice() {
        if let (Ok(num), Ok(den)) = (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            if den != 0.0 {
                return Fraction::Value(num / den);
            }
        }
    }
    Fraction::Unparsed(text.to_string())
}

pub(crate) fn parse_text_f64(text: &str) -> Result<f64, TagError> {
    let text = text.trim().trim_end_matches('\0');
    if text.contains('/') {
        if let Fraction::Value(value) = try_parse_fraction(text) {
            return Ok(value);
        }
    }
    text.parse::<f64>()
        .map_err(|_| TagError::NotNumeric(text.to_string()))
}

fn truncate_f64(value: f64) -> Result<i64, TagError> {
    if value.is_finite() && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Ok(value.trunc() as i64)
    } else {
        Err(TagError::OutOfRange(value.to_string()))
    }
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_values_zero_denominator() {
        let value = ExifValue::rationals(&[(1, 2), (3, 0), (9, 3)]);
        assert_eq!(float_values(&value), Ok(vec![Some(0.5), None, Some(3.0)]));
        assert_eq!(float_values(&value), float_values(&value));
    }

    #[test]
    fn test_float_value_empty_and_degenerate() {
        assert_eq!(float_value(&ExifValue::Rationals(Vec::new())), Ok(None));
        assert_eq!(float_value(&ExifValue::rational(1, 0)), Ok(None));
        assert_eq!(float_value(&ExifValue::rational(1, 50)), Ok(Some(0.02)));
    }

    #[test]
    fn test_int_values() {
        assert_eq!(int_value(&ExifValue::integer(6)), Ok(Some(6)));
        assert_eq!(int_value(&ExifValue::rational(7, 2)), Ok(Some(3)));
        assert_eq!(int_value(&ExifValue::ascii("-25")), Ok(Some(-25)));
        assert_eq!(int_value(&ExifValue::rational(1, 0)), Err(TagError::ZeroDenominator));
        assert!(matches!(int_value(&ExifValue::ascii("abc")), Err(TagError::NotNumeric(_))));
    }

    #[test]
    fn test_dms_to_decimal() {
        let dms = [Some(10.0), Some(30.0), Some(0.0)];
        assert_eq!(dms_to_decimal(&dms, "S"), Ok(Some(-10.5)));
        assert_eq!(dms_to_decimal(&dms, "N"), Ok(Some(10.5)));
        assert_eq!(dms_to_decimal(&dms, "w"), Ok(Some(-10.5)));
        assert_eq!(dms_to_decimal(&[Some(10.0), None, Some(0.0)], "N"), Ok(None));
        assert!(dms_to_decimal(&[Some(10.0), Some(1.0)], "N").is_err());
        assert!(dms_to_decimal(&dms, "").is_err());
    }

    #[test]
    fn test_exif_dms_to_decimal() {
        let dms = ExifValue::rationals(&[(46, 1), (1, 1), (3600, 100)]);
        let decimal = exif_dms_to_decimal(&dms, &ExifValue::ascii("E")).unwrap().unwrap();
        assert!((decimal - (46.0 + 1.0 / 60.0 + 36.0 / 3600.0)).abs() < 1e-12);

        let degenerate = ExifValue::rationals(&[(46, 1), (1, 0), (0, 1)]);
        assert_eq!(exif_dms_to_decimal(&degenerate, &ExifValue::ascii("N")), Ok(None));
    }

    #[test]
    fn test_try_parse_fraction() {
        assert_eq!(try_parse_fraction("1/50"), Fraction::Value(0.02));
        assert_eq!(try_parse_fraction("abc"), Fraction::Unparsed("abc".to_string()));
        assert_eq!(try_parse_fraction("1/0"), Fraction::Unparsed("1/0".to_string()));
        assert_eq!(try_parse_fraction("1/2/3"), Fraction::Unparsed("1/2/3".to_string()));
    }

    #[test]
    fn test_list_values() {
        assert_eq!(list_values(&ExifValue::Integers(vec![64, 64, 64, 64])), "64 64 64 64");
        assert_eq!(list_values(&ExifValue::rationals(&[(4096, 1), (1, 2)])), "4096 0.5");
    }
}
