//! Resolver configuration types

use crate::photo_metadata::model::types::DEFAULT_FOCAL_RATIO;

/// Configuration for metadata resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Focal ratio used when neither EXIF nor the sensor table can supply one
    pub default_focal_ratio: f64,
    /// Factor applied to every GPS standard deviation read from XMP.
    /// Left at 1.0 the values pass through untouched.
    pub gps_stddev_scale: f64,
    /// Latitude offset in degrees used to derive the local north vector
    pub north_delta_degrees: f64,
    /// Whether a GPS position of exactly (0, 0) is reported as suspicious
    pub warn_null_island: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_focal_ratio: DEFAULT_FOCAL_RATIO,
            gps_stddev_scale: 1.0,
            north_delta_degrees: 1e-7,
            warn_null_island: true,
        }
    }
}

impl ResolverConfig {
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }
}

/// Builder for ResolverConfig
#[derive(Default)]
pub struct ResolverConfigBuilder {
    default_focal_ratio: Option<f64>,
    gps_stddev_scale: Option<f64>,
    north_delta_degrees: Option<f64>,
    warn_null_island: Option<bool>,
}

impl ResolverConfigBuilder {
    pub fn default_focal_ratio(mut self, ratio: f64) -> Self {
        self.default_focal_ratio = Some(ratio);
        self
    }

    pub fn gps_stddev_scale(mut self, scale: f64) -> Self {
        self.gps_stddev_scale = Some(scale);
        self
    }

    pub fn north_delta_degrees(mut self, delta: f64) -> Self {
        self.north_delta_degrees = Some(delta);
        self
    }

    pub fn warn_null_island(mut self, enable: bool) -> Self {
        self.warn_null_island = Some(enable);
        self
    }

    pub fn build(self) -> ResolverConfig {
        let default = ResolverConfig::default();
        ResolverConfig {
            default_focal_ratio: self.default_focal_ratio.unwrap_or(default.default_focal_ratio),
            gps_stddev_scale: self.gps_stddev_scale.unwrap_or(default.gps_stddev_scale),
            north_delta_degrees: self.north_delta_degrees.unwrap_or(default.north_delta_degrees),
            warn_null_island: self.warn_null_island.unwrap_or(default.warn_null_island),
        }
    }
}
