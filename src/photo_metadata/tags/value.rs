//! Raw tag value types as handed over by the EXIF and XMP readers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::photo_metadata::common::error::TagError;

/// An unsigned or signed EXIF rational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rational {
    pub num: i64,
    pub den: i64,
}

impl Rational {
    pub const fn new(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    /// `None` for a zero denominator.
    pub fn to_f64(self) -> Option<f64> {
        if self.den == 0 {
            None
        } else {
            Some(self.num as f64 / self.den as f64)
        }
    }
}

impl From<(i64, i64)> for Rational {
    fn from((num, den): (i64, i64)) -> Self {
        Self::new(num, den)
    }
}

/// A decoded EXIF tag value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExifValue {
    Ascii(String),
    /// Text the reader could not decode itself; decoding may still fail.
    Bytes(Vec<u8>),
    Integers(Vec<i64>),
    Rationals(Vec<Rational>),
    Floats(Vec<f64>),
}

impl ExifValue {
    pub fn ascii(text: impl Into<String>) -> Self {
        ExifValue::Ascii(text.into())
    }

    pub fn integer(value: i64) -> Self {
        ExifValue::Integers(vec![value])
    }

    pub fn rational(num: i64, den: i64) -> Self {
        ExifValue::Rationals(vec![Rational::new(num, den)])
    }

    pub fn rationals(values: &[(i64, i64)]) -> Self {
        ExifValue::Rationals(values.iter().copied().map(Rational::from).collect())
    }

    /// The value as text, for string tags such as make, model and date-times.
    pub fn text(&self) -> Result<String, TagError> {
        match self {
            ExifValue::Ascii(text) => Ok(text.clone()),
            ExifValue::Bytes(bytes) => String::from_utf8(bytes.clone())
                .map(|text| text.trim_end_matches('\0').to_string())
                .map_err(|_| TagError::InvalidText),
            _ => Err(TagError::NotText),
        }
    }
}

pub type ExifTags = HashMap<String, ExifValue>;

/// A value from an XMP `rdf:Description` block.
///
/// `Seq` holds the items of an `rdf:Seq`; read as text they are joined with a
/// single space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XmpValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Seq(Vec<String>),
}

impl XmpValue {
    pub fn text(text: impl Into<String>) -> Self {
        XmpValue::Text(text.into())
    }

    pub fn seq<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        XmpValue::Seq(items.into_iter().map(Into::into).collect())
    }

    /// `None` for an empty sequence, which readers treat as absent.
    pub fn as_text(&self) -> Option<String> {
        match self {
            XmpValue::Integer(value) => Some(value.to_string()),
            XmpValue::Float(value) => Some(value.to_string()),
            XmpValue::Text(text) => Some(text.clone()),
            XmpValue::Seq(items) if items.is_empty() => None,
            XmpValue::Seq(items) => Some(items.join(" ")),
        }
    }
}

pub type XmpBlock = HashMap<String, XmpValue>;
