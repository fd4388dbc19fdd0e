//! Non-fatal notices collected while resolving a photo.
//!
//! Resolver stages never fail on a bad tag. They push a [`Notice`] and move on;
//! the pipeline logs every notice and hands the list back to the caller.

use std::fmt;

use crate::photo_metadata::common::error::{GeometryError, TagError};

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A tag was present but could not be decoded; the field keeps its default.
    TagDecode { tag: String, error: TagError },
    /// Orientation angles were left unset.
    DegenerateGeometry(GeometryError),
    /// Data was accepted but looks wrong.
    SuspiciousData(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::TagDecode { tag, error } => write!(f, "cannot read {}: {}", tag, error),
            Notice::DegenerateGeometry(error) => write!(f, "cannot compute OPK angles: {}", error),
            Notice::SuspiciousData(message) => f.write_str(message),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    notices: Vec<Notice>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn tag_decode(&mut self, tag: impl Into<String>, error: TagError) {
        self.push(Notice::TagDecode { tag: tag.into(), error });
    }

    pub fn suspicious(&mut self, message: impl Into<String>) {
        self.push(Notice::SuspiciousData(message.into()));
    }

    /// Unwraps a per-tag result, recording the error as a notice.
    pub fn capture<T>(&mut self, tag: &str, result: std::result::Result<T, TagError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.tag_decode(tag, error);
                None
            }
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
    }
}

/// A best-effort value together with everything that went wrong producing it.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub notices: Vec<Notice>,
}

impl<T> Resolved<T> {
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self {
            value,
            notices: diagnostics.into_notices(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_records_errors() {
        let mut diagnostics = Diagnostics::new();

        assert_eq!(diagnostics.capture("EXIF FNumber", Ok(2.8)), Some(2.8));
        assert!(diagnostics.is_empty());

        let missing: std::result::Result<f64, TagError> = Err(TagError::ZeroDenominator);
        assert_eq!(diagnostics.capture("EXIF ExposureTime", missing), None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.notices()[0],
            Notice::TagDecode {
                tag: "EXIF ExposureTime".to_string(),
                error: TagError::ZeroDenominator,
            }
        );
    }

    #[test]
    fn test_notice_display() {
        let notice = Notice::DegenerateGeometry(GeometryError::DegenerateNorth);
        assert!(notice.to_string().contains("divider = 0"));
    }
}
