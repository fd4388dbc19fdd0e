//! Extended and vendor fields from XMP description blocks.
//!
//! Blocks are applied in order, so a later block overrides an earlier one.
//! Every field is read independently; a bad value only costs that field.

use tracing::debug;

use crate::photo_metadata::common::diagnostics::Diagnostics;
use crate::photo_metadata::common::error::TagError;
use crate::photo_metadata::model::types::CameraMetadata;
use crate::photo_metadata::resolve::config::ResolverConfig;
use crate::photo_metadata::tags::value::XmpBlock;
use crate::photo_metadata::tags::xmp_lookup::{xmp_f64, xmp_i64, xmp_text};

const BAND_NAME: &[&str] = &["Camera:BandName", "@Camera:BandName"];
const BAND_INDEX: &[&str] = &[
    "DLS:SensorId",           // MicaSense RedEdge
    "@Camera:RigCameraIndex", // Parrot Sequoia, Sentera
    "Camera:RigCameraIndex",  // MicaSense Altum
];
const RADIOMETRIC_CALIBRATION: &[&str] = &["MicaSense:RadiometricCalibration"];
const VIGNETTING_CENTER: &[&str] = &["Camera:VignettingCenter", "Sentera:VignettingCenter"];
const VIGNETTING_POLYNOMIAL: &[&str] = &["Camera:VignettingPolynomial", "Sentera:VignettingPolynomial"];
const HORIZONTAL_IRRADIANCE: &[&str] = &["Camera:HorizontalIrradiance"];
const IRRADIANCE_SCALE_TO_SI: &[&str] = &["Camera:IrradianceScaleToSIUnits"];
const SUN_SENSOR: &[&str] = &["Camera:SunSensor"];
const SPECTRAL_IRRADIANCE: &[&str] = &["Camera:SpectralIrradiance", "Camera:Irradiance"];
const CAPTURE_UUID: &[&str] = &["@drone-dji:CaptureUUID", "@Camera:ImageUniqueID"];
const MAKE: &[&str] = &["@tiff:Make"];
const MODEL: &[&str] = &["@tiff:Model"];

const LONGITUDE: &[&str] = &["@drone-dji:Longitude"];
const LATITUDE: &[&str] = &["@drone-dji:Latitude"];
const ALTITUDE: &[&str] = &["@drone-dji:RelativeAltitude"];

const RTK_STD_LON: &str = "@drone-dji:RtkStdLon";
const RTK_STD_LAT: &str = "@drone-dji:RtkStdLat";
const RTK_STD_HGT: &str = "@drone-dji:RtkStdHgt";
const GPS_XY_ACCURACY: &[&str] = &["@Camera:GPSXYAccuracy", "GPSXYAccuracy"];
const GPS_Z_ACCURACY: &[&str] = &["@Camera:GPSZAccuracy", "GPSZAccuracy"];

const DLS_YAW: &str = "DLS:Yaw";
const DLS_PITCH: &str = "DLS:Pitch";
const DLS_ROLL: &str = "DLS:Roll";

const MODEL_TYPE: &[&str] = &["@Camera:ModelType", "Camera:ModelType"];
const YAW: &[&str] = &["@drone-dji:FlightYawDegree", "@Camera:Yaw", "Camera:Yaw"];
const PITCH: &[&str] = &["@drone-dji:GimbalPitchDegree", "@Camera:Pitch", "Camera:Pitch"];
const ROLL: &[&str] = &["@drone-dji:GimbalRollDegree", "@Camera:Roll", "Camera:Roll"];

const SEQ_SENSOR_MODEL: &[&str] = &["Camera:SensorModel"];
const SEQ_IRRADIANCE_CALIBRATION: &[&str] = &["@Camera:IrradianceCalibrationMeasurement"];
const SEQ_IRRADIANCE_LIST: &[&str] = &["Camera:IrradianceList"];
const P4M_SENSOR_GAIN: &[&str] = &["@drone-dji:SensorGain"];
const P4M_SENSOR_GAIN_ADJUSTMENT: &[&str] = &["@drone-dji:SensorGainAdjustment"];
const P4M_BLACK_CURRENT: &[&str] = &["Camera:BlackCurrent"];

pub fn resolve_xmp(
    mut meta: CameraMetadata,
    blocks: &[XmpBlock],
    config: &ResolverConfig,
    diagnostics: &mut Diagnostics,
) -> CameraMetadata {
    let mut ypr_from_xmp = false;
    for block in blocks {
        ypr_from_xmp |= resolve_block(&mut meta, block, config, diagnostics);
    }

    if ypr_from_xmp {
        normalize_ypr(&mut meta);
    }

    debug!(
        blocks = blocks.len(),
        band = %meta.band_name,
        ypr = ?meta.pose.ypr(),
        "XMP resolved"
    );
    meta
}

/// Applies one description block. Returns whether it supplied any of
/// yaw/pitch/roll.
fn resolve_block(
    meta: &mut CameraMetadata,
    block: &XmpBlock,
    config: &ResolverConfig,
    diagnostics: &mut Diagnostics,
) -> bool {
    if let Some((_, band_name)) = xmp_text(block, BAND_NAME) {
        meta.band_name = band_name.replace(' ', "");
    }
    if let Some((tag, parsed)) = xmp_i64(block, BAND_INDEX) {
        if let Some(index) = diagnostics.capture(tag, parsed) {
            meta.band_index = index;
        }
    }

    assign_text(&mut meta.radiometry.radiometric_calibration, block, RADIOMETRIC_CALIBRATION);
    assign_text(&mut meta.radiometry.vignetting_center, block, VIGNETTING_CENTER);
    assign_text(&mut meta.radiometry.vignetting_polynomial, block, VIGNETTING_POLYNOMIAL);
    assign_f64(&mut meta.radiometry.horizontal_irradiance, block, HORIZONTAL_IRRADIANCE, diagnostics);
    assign_f64(&mut meta.radiometry.irradiance_scale_to_si, block, IRRADIANCE_SCALE_TO_SI, diagnostics);
    assign_f64(&mut meta.radiometry.sun_sensor, block, SUN_SENSOR, diagnostics);
    assign_f64(&mut meta.radiometry.spectral_irradiance, block, SPECTRAL_IRRADIANCE, diagnostics);

    assign_text(&mut meta.capture_uuid, block, CAPTURE_UUID);

    // Some cameras only carry make/model in XMP
    if meta.make.is_empty() {
        if let Some((_, make)) = xmp_text(block, MAKE) {
            meta.make = make;
        }
    }
    if meta.model.is_empty() {
        if let Some((_, model)) = xmp_text(block, MODEL) {
            meta.model = model;
        }
    }

    assign_f64(&mut meta.geo.longitude, block, LONGITUDE, diagnostics);
    assign_f64(&mut meta.geo.latitude, block, LATITUDE, diagnostics);
    assign_f64(&mut meta.geo.altitude, block, ALTITUDE, diagnostics);

    resolve_gps_accuracy(meta, block, config.gps_stddev_scale, diagnostics);

    if block.contains_key(DLS_YAW) {
        assign_f64(&mut meta.pose.dls_yaw, block, &[DLS_YAW], diagnostics);
        assign_f64(&mut meta.pose.dls_pitch, block, &[DLS_PITCH], diagnostics);
        assign_f64(&mut meta.pose.dls_roll, block, &[DLS_ROLL], diagnostics);
    }

    if let Some((_, model_type)) = xmp_text(block, MODEL_TYPE) {
        if !meta.override_projection(&model_type) {
            debug!("Ignoring unknown camera projection {:?}", model_type);
        }
    }

    let mut ypr_found = false;
    for (slot, candidates) in [
        (&mut meta.pose.yaw, YAW),
        (&mut meta.pose.pitch, PITCH),
        (&mut meta.pose.roll, ROLL),
    ] {
        ypr_found |= assign_f64(slot, block, candidates, diagnostics);
    }

    assign_text(&mut meta.vendor.seq_sensor_model, block, SEQ_SENSOR_MODEL);
    assign_text(&mut meta.vendor.seq_irradiance_calibration, block, SEQ_IRRADIANCE_CALIBRATION);
    assign_text(&mut meta.vendor.seq_irradiance_list, block, SEQ_IRRADIANCE_LIST);
    assign_f64(&mut meta.vendor.p4m_sensor_gain, block, P4M_SENSOR_GAIN, diagnostics);
    assign_f64(&mut meta.vendor.p4m_sensor_gain_adjustment, block, P4M_SENSOR_GAIN_ADJUSTMENT, diagnostics);
    assign_f64(&mut meta.vendor.p4m_black_current, block, P4M_BLACK_CURRENT, diagnostics);

    ypr_found
}

/// RTK standard deviations take precedence over the generic accuracy tags.
fn resolve_gps_accuracy(meta: &mut CameraMetadata, block: &XmpBlock, scale: f64, diagnostics: &mut Diagnostics) {
    if block.contains_key(RTK_STD_LON) {
        let lon = read_f64(block, &[RTK_STD_LON], diagnostics);
        let lat = match xmp_f64(block, &[RTK_STD_LAT]) {
            Some((tag, parsed)) => diagnostics.capture(tag, parsed),
            None => {
                diagnostics.tag_decode(RTK_STD_LAT, TagError::Missing(RTK_STD_LAT.to_string()));
                None
            }
        };
        if let (Some(lon), Some(lat)) = (lon, lat) {
            meta.geo.gps_xy_stddev = Some(lon.max(lat) * scale);
        }
        if let Some(height) = read_f64(block, &[RTK_STD_HGT], diagnostics) {
            meta.geo.gps_z_stddev = Some(height * scale);
        }
    } else {
        if let Some(xy) = read_f64(block, GPS_XY_ACCURACY, diagnostics) {
            meta.geo.gps_xy_stddev = Some(xy * scale);
        }
        if let Some(z) = read_f64(block, GPS_Z_ACCURACY, diagnostics) {
            meta.geo.gps_z_stddev = Some(z * scale);
        }
    }
}

/// Brings vendor attitude conventions to nadir-camera degrees: pitch 0 looks
/// straight down, yaw 0 puts the top of the image north.
fn normalize_ypr(meta: &mut CameraMetadata) {
    if !meta.has_ypr() {
        return;
    }

    match meta.make.to_lowercase().as_str() {
        // Gimbal pitch is -90 at nadir
        "dji" | "hasselblad" => meta.pose.pitch = meta.pose.pitch.map(|pitch| 90.0 + pitch),
        "sensefly" => meta.pose.roll = meta.pose.roll.map(|roll| -roll),
        _ => {}
    }
}

fn read_f64(block: &XmpBlock, candidates: &[&str], diagnostics: &mut Diagnostics) -> Option<f64> {
    let (tag, parsed) = xmp_f64(block, candidates)?;
    diagnostics.capture(tag, parsed)
}

fn assign_f64(slot: &mut Option<f64>, block: &XmpBlock, candidates: &[&str], diagnostics: &mut Diagnostics) -> bool {
    match read_f64(block, candidates, diagnostics) {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

fn assign_text(slot: &mut Option<String>, block: &XmpBlock, candidates: &[&str]) {
    if let Some((_, text)) = xmp_text(block, candidates) {
        *slot = Some(text);
    }
}
