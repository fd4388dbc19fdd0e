use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera projection models understood by the reconstruction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    Perspective,
    Fisheye,
    #[default]
    Brown,
    Dual,
    Equirectangular,
    Spherical,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown camera projection: {0:?}")]
pub struct ParseProjectionError(pub String);

impl Projection {
    pub const ALL: [Projection; 6] = [
        Projection::Perspective,
        Projection::Fisheye,
        Projection::Brown,
        Projection::Dual,
        Projection::Equirectangular,
        Projection::Spherical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Projection::Perspective => "perspective",
            Projection::Fisheye => "fisheye",
            Projection::Brown => "brown",
            Projection::Dual => "dual",
            Projection::Equirectangular => "equirectangular",
            Projection::Spherical => "spherical",
        }
    }
}

impl FromStr for Projection {
    type Err = ParseProjectionError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Projection::ALL
            .into_iter()
            .find(|projection| projection.as_str() == wanted)
            .ok_or_else(|| ParseProjectionError(s.to_string()))
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
