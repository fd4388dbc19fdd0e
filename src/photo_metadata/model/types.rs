//! The resolved per-photo entity.

use std::fmt;

use crate::photo_metadata::common::error::{MetadataError, Result};
use crate::photo_metadata::model::projection::Projection;
use crate::photo_metadata::model::quirk::CameraQuirk;

/// Focal length over sensor width when nothing better is known.
pub const DEFAULT_FOCAL_RATIO: f64 = 0.85;

/// Position and its reported accuracy. Latitude and longitude are either both
/// set or both unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geolocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    /// Horizontal standard deviation in meters.
    pub gps_xy_stddev: Option<f64>,
    /// Vertical standard deviation in meters.
    pub gps_z_stddev: Option<f64>,
}

impl Geolocation {
    pub fn has_position(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Attitude angles in degrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub yaw: Option<f64>,
    pub pitch: Option<f64>,
    pub roll: Option<f64>,
    pub omega: Option<f64>,
    pub phi: Option<f64>,
    pub kappa: Option<f64>,
    pub dls_yaw: Option<f64>,
    pub dls_pitch: Option<f64>,
    pub dls_roll: Option<f64>,
}

impl Pose {
    pub fn ypr(&self) -> Option<(f64, f64, f64)> {
        Some((self.yaw?, self.pitch?, self.roll?))
    }

    pub fn opk(&self) -> Option<(f64, f64, f64)> {
        Some((self.omega?, self.phi?, self.kappa?))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureSettings {
    /// Milliseconds since the Unix epoch, UTC.
    pub utc_time_ms: Option<f64>,
    /// Seconds.
    pub exposure_time: Option<f64>,
    pub fnumber: Option<f64>,
    pub iso_speed: Option<i64>,
    pub bits_per_sample: Option<i64>,
}

/// Radiometric tags, kept in their raw textual form until queried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Radiometry {
    /// Space-separated black levels.
    pub black_level: Option<String>,
    /// Space-separated calibration coefficients.
    pub radiometric_calibration: Option<String>,
    pub vignetting_center: Option<String>,
    pub vignetting_polynomial: Option<String>,
    pub spectral_irradiance: Option<f64>,
    pub horizontal_irradiance: Option<f64>,
    pub irradiance_scale_to_si: Option<f64>,
    pub sun_sensor: Option<f64>,
}

/// Vendor blobs interpreted only by [`CameraQuirk`]-specific getters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorBlobs {
    pub seq_sensor_model: Option<String>,
    pub seq_irradiance_calibration: Option<String>,
    /// Base64 packed irradiance records.
    pub seq_irradiance_list: Option<String>,
    pub p4m_sensor_gain: Option<f64>,
    pub p4m_sensor_gain_adjustment: Option<f64>,
    pub p4m_black_current: Option<f64>,
}

/// An externally corrected position and attitude that supersedes embedded
/// metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoEntry {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub omega: Option<f64>,
    pub phi: Option<f64>,
    pub kappa: Option<f64>,
    pub horizontal_accuracy: Option<f64>,
    pub vertical_accuracy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraMetadata {
    pub(crate) filename: String,
    pub(crate) make: String,
    pub(crate) model: String,
    pub(crate) band_name: String,
    pub(crate) band_index: i64,
    pub(crate) capture_uuid: Option<String>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) orientation: u16,
    pub(crate) projection: Projection,
    pub(crate) focal_ratio: f64,
    pub(crate) geo: Geolocation,
    pub(crate) pose: Pose,
    pub(crate) capture: CaptureSettings,
    pub(crate) radiometry: Radiometry,
    pub(crate) vendor: VendorBlobs,
    pub(crate) quirk: CameraQuirk,
    pub(crate) mask: Option<String>,
}

impl CameraMetadata {
    /// A blank record for a photo of known size. Fails on zero dimensions.
    pub fn new(filename: impl Into<String>, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MetadataError::InvalidDimensions(width, height));
        }

        Ok(Self {
            filename: filename.into(),
            make: String::new(),
            model: String::new(),
            band_name: "RGB".to_string(),
            band_index: 0,
            capture_uuid: None,
            width,
            height,
            orientation: 1,
            projection: Projection::default(),
            focal_ratio: DEFAULT_FOCAL_RATIO,
            geo: Geolocation::default(),
            pose: Pose::default(),
            capture: CaptureSettings::default(),
            radiometry: Radiometry::default(),
            vendor: VendorBlobs::default(),
            quirk: CameraQuirk::default(),
            mask: None,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn band_name(&self) -> &str {
        &self.band_name
    }

    pub fn band_index(&self) -> i64 {
        self.band_index
    }

    pub fn capture_uuid(&self) -> Option<&str> {
        self.capture_uuid.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// EXIF orientation code, 1 to 8.
    pub fn orientation(&self) -> u16 {
        self.orientation
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn focal_ratio(&self) -> f64 {
        self.focal_ratio
    }

    pub fn geolocation(&self) -> &Geolocation {
        &self.geo
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn capture(&self) -> &CaptureSettings {
        &self.capture
    }

    pub fn radiometry(&self) -> &Radiometry {
        &self.radiometry
    }

    pub fn vendor(&self) -> &VendorBlobs {
        &self.vendor
    }

    pub fn quirk(&self) -> CameraQuirk {
        self.quirk
    }

    pub fn mask(&self) -> Option<&str> {
        self.mask.as_deref()
    }

    pub fn has_ypr(&self) -> bool {
        self.pose.ypr().is_some()
    }

    pub fn has_opk(&self) -> bool {
        self.pose.opk().is_some()
    }

    pub fn has_geo(&self) -> bool {
        self.geo.has_position()
    }

    pub fn set_mask(&mut self, mask: impl Into<String>) {
        self.mask = Some(mask.into());
    }

    /// Replaces position, OPK, DLS pose and GPS accuracy as one unit.
    pub fn apply_geo_entry(&mut self, entry: &GeoEntry) {
        self.geo.latitude = Some(entry.latitude);
        self.geo.longitude = Some(entry.longitude);
        self.geo.altitude = entry.altitude;
        self.geo.gps_xy_stddev = entry.horizontal_accuracy;
        self.geo.gps_z_stddev = entry.vertical_accuracy;
        self.pose.omega = entry.omega;
        self.pose.phi = entry.phi;
        self.pose.kappa = entry.kappa;
        self.pose.dls_yaw = entry.omega;
        self.pose.dls_pitch = entry.phi;
        self.pose.dls_roll = entry.kappa;
    }

    /// Returns `false` and keeps the current projection for unknown names.
    pub fn override_projection(&mut self, projection: &str) -> bool {
        match projection.parse() {
            Ok(projection) => {
                self.projection = projection;
                true
            }
            Err(_) => false,
        }
    }

    pub fn override_gps_dop(&mut self, dop: f64) {
        self.geo.gps_xy_stddev = Some(dop);
        self.geo.gps_z_stddev = Some(dop);
    }
}

impl fmt::Display for CameraMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | camera: {} {} | dimensions: {} x {} | lat: {:?} | lon: {:?} | alt: {:?} | band: {} ({})",
            self.filename,
            self.make,
            self.model,
            self.width,
            self.height,
            self.geo.latitude,
            self.geo.longitude,
            self.geo.altitude,
            self.band_name,
            self.band_index,
        )
    }
}
