use thiserror::Error;

/// Fatal errors. Only these abort resolution of a photo.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Corrupted source image: {0}")]
    CorruptedSource(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(u32, u32),

    #[error("Failed to read tags: {0}")]
    TagReadError(String),

    #[error("Failed to load sensor table: {0}")]
    SensorTableError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetadataError>;

/// Failure to interpret a single tag. Always recovered from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TagError {
    #[error("required tag is missing: {0}")]
    Missing(String),

    #[error("rational has a zero denominator")]
    ZeroDenominator,

    #[error("not a numeric value: {0:?}")]
    NotNumeric(String),

    #[error("value is not text")]
    NotText,

    #[error("text is not valid UTF-8")]
    InvalidText,

    #[error("expected {expected} components, found {found}")]
    ComponentCount { expected: usize, found: usize },

    #[error("invalid hemisphere reference: {0:?}")]
    InvalidReference(String),

    #[error("invalid date-time: {0:?}")]
    InvalidDateTime(String),

    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("unknown resolution unit: {0}")]
    UnknownResolutionUnit(f64),

    #[error("only one of latitude/longitude is present")]
    IncompletePosition,

    #[error("malformed {what}: {reason}")]
    MalformedBlob { what: &'static str, reason: String },

    #[error("tag source unavailable: {0}")]
    Unreadable(String),
}

/// Exterior orientation could not be derived.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("north vector has zero length, divider = 0")]
    DegenerateNorth,
}
