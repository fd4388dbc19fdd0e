//! Radiometric calibration getters.
//!
//! Sequoia and P4 Multispectral carry their calibration in vendor tags that
//! take precedence over the generic ones.

use tracing::warn;

use crate::photo_metadata::model::quirk::CameraQuirk;
use crate::photo_metadata::model::types::CameraMetadata;

/// Parses a separator-delimited list of numbers. Any bad element fails the list.
pub(crate) fn parse_numbers(text: &str, separator: char) -> Option<Vec<f64>> {
    let parsed: Result<Vec<f64>, _> = text.split(separator).map(|part| part.trim().parse::<f64>()).collect();
    match parsed {
        Ok(values) => Some(values),
        Err(error) => {
            warn!(text, "Cannot parse number list: {}", error);
            None
        }
    }
}

impl CameraMetadata {
    /// Parameters of the Sequoia sensor model, comma-separated in the tag.
    fn sequoia_sensor_model(&self) -> Option<Vec<f64>> {
        parse_numbers(self.vendor.seq_sensor_model.as_deref()?, ',')
    }

    /// Three radiometric calibration coefficients. Unknown slots are `None`.
    pub fn radiometric_calibration(&self) -> [Option<f64>; 3] {
        match self.quirk {
            CameraQuirk::Sequoia => {
                let scale = self
                    .sequoia_sensor_model()
                    .and_then(|params| params.first().copied())
                    .map(|p0| 1.0 / (100.0 * p0));
                [scale, None, None]
            }
            CameraQuirk::P4Multispectral => [
                self.vendor.p4m_sensor_gain_adjustment.map(|adj| adj / 100.0),
                None,
                None,
            ],
            CameraQuirk::Generic => self
                .radiometry
                .radiometric_calibration
                .as_deref()
                .and_then(|text| parse_numbers(text, ' '))
                .and_then(|values| <[f64; 3]>::try_from(values).ok())
                .map(|[a, b, c]| [Some(a), Some(b), Some(c)])
                .unwrap_or([None; 3]),
        }
    }

    pub fn dark_level(&self) -> Option<f64> {
        match self.quirk {
            CameraQuirk::Sequoia => self.sequoia_sensor_model()?.get(1).copied(),
            CameraQuirk::P4Multispectral => self.vendor.p4m_black_current,
            CameraQuirk::Generic => {
                let black_level = self.radiometry.black_level.as_deref()?;
                if black_level.is_empty() {
                    return None;
                }
                let levels = parse_numbers(black_level, ' ')?;
                Some(levels.iter().sum::<f64>() / levels.len() as f64)
            }
        }
    }

    /// Sensor gain; ISO / 100 unless the camera reports it directly.
    pub fn gain(&self) -> Option<f64> {
        if self.quirk == CameraQuirk::P4Multispectral {
            return self.vendor.p4m_sensor_gain;
        }
        self.capture.iso_speed.filter(|&iso| iso != 0).map(|iso| iso as f64 / 100.0)
    }

    pub fn vignetting_center(&self) -> Option<[f64; 2]> {
        let values = parse_numbers(self.radiometry.vignetting_center.as_deref()?, ' ')?;
        <[f64; 2]>::try_from(values).ok()
    }

    /// Vignetting polynomial coefficients, lowest order last except for Sentera
    /// which already stores them that way.
    pub fn vignetting_polynomial(&self) -> Option<Vec<f64>> {
        let text = self.radiometry.vignetting_polynomial.as_deref()?;
        if text.is_empty() {
            return None;
        }
        let mut coefficients = parse_numbers(text, ' ')?;
        if self.make != "Sentera" {
            coefficients.reverse();
        }
        Some(coefficients)
    }

    /// Exposure over f-number squared.
    pub fn photometric_exposure(&self) -> Option<f64> {
        match (self.capture.exposure_time, self.capture.fnumber) {
            (Some(exposure), Some(fnumber)) if exposure > 0.0 && fnumber > 0.0 => {
                Some(exposure / (fnumber * fnumber))
            }
            _ => None,
        }
    }

    pub fn horizontal_irradiance_si(&self) -> Option<f64> {
        let irradiance = self.radiometry.horizontal_irradiance?;
        Some(irradiance * self.radiometry.irradiance_scale_to_si.unwrap_or(1.0))
    }

    /// Sun sensor attitude, zeros when the sensor reported none.
    pub fn dls_pose(&self) -> [f64; 3] {
        match self.pose.dls_yaw {
            Some(yaw) => [yaw, self.pose.dls_pitch.unwrap_or(0.0), self.pose.dls_roll.unwrap_or(0.0)],
            None => [0.0; 3],
        }
    }

    /// Largest representable pixel value plus one.
    pub fn bit_depth_max(&self) -> Option<f64> {
        let bits = self.capture.bits_per_sample.filter(|&bits| bits > 0)?;
        Some(2f64.powi(bits as i32))
    }
}
