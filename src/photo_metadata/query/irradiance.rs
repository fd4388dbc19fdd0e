//! Sun sensor irradiance.
//!
//! Sequoia stores a base64 log of packed little-endian records:
//!
//! | offset | type | field        |
//! |--------|------|--------------|
//! | 0      | u64  | timestamp    |
//! | 8      | u16  | CH0 count    |
//! | 10     | u16  | CH1 count    |
//! | 12     | u16  | gain index   |
//! | 14     | u16  | integ. time  |
//! | 16     | f32  | yaw          |
//! | 20     | f32  | pitch        |
//! | 24     | f32  | roll         |

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::warn;

use crate::photo_metadata::common::error::TagError;
use crate::photo_metadata::model::quirk::CameraQuirk;
use crate::photo_metadata::model::types::CameraMetadata;
use crate::photo_metadata::query::radiometry::parse_numbers;

const RECORD_SIZE: usize = 28;
const GAIN_TIERS: usize = 4;
/// Integration time the calibration is normalized to.
const REFERENCE_INTEGRATION: f64 = 600.0;
/// Raw sun sensor counts are unsigned 16-bit.
const SUN_SENSOR_FULL_SCALE: f64 = 65535.0;
/// Only the most recent readings are averaged.
const AVERAGED_RECORDS: usize = 3;

/// The fields of a record the estimate needs. Timestamp, CH1 and the
/// attitude floats are skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IrradianceRecord {
    ch0: u16,
    gain_index: u16,
    integration_time: u16,
}

impl IrradianceRecord {
    fn parse(chunk: &[u8]) -> Result<Self, TagError> {
        let bytes: &[u8; RECORD_SIZE] = chunk.try_into().map_err(|_| TagError::MalformedBlob {
            what: "irradiance record",
            reason: format!("expected {} bytes, got {}", RECORD_SIZE, chunk.len()),
        })?;
        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);

        Ok(Self {
            ch0: u16_at(8),
            gain_index: u16_at(12),
            integration_time: u16_at(14),
        })
    }

    fn irradiance(&self, calibration: &[f64; GAIN_TIERS]) -> Result<f64, TagError> {
        let cal = calibration
            .get(self.gain_index as usize)
            .ok_or_else(|| TagError::MalformedBlob {
                what: "irradiance record",
                reason: format!("gain index {} out of range", self.gain_index),
            })?;
        if self.integration_time == 0 {
            return Err(TagError::MalformedBlob {
                what: "irradiance record",
                reason: "zero integration time".to_string(),
            });
        }
        Ok(self.ch0 as f64 * (REFERENCE_INTEGRATION / self.integration_time as f64) / cal)
    }
}

/// Per-gain-tier calibration. Rows are `gain index, integ. time, CH0, CH1`.
fn sequoia_calibration(text: &str) -> Result<[f64; GAIN_TIERS], TagError> {
    let values = parse_numbers(text, ',').ok_or_else(|| TagError::MalformedBlob {
        what: "irradiance calibration",
        reason: "non-numeric value".to_string(),
    })?;
    if values.len() < GAIN_TIERS * 4 - 1 {
        return Err(TagError::MalformedBlob {
            what: "irradiance calibration",
            reason: format!("expected at least {} values, got {}", GAIN_TIERS * 4 - 1, values.len()),
        });
    }

    let mut calibration = [0.0; GAIN_TIERS];
    for (tier, cal) in calibration.iter_mut().enumerate() {
        let row = tier * 4;
        *cal = values[row + 2] * (REFERENCE_INTEGRATION / values[row + 1]);
    }
    Ok(calibration)
}

fn decode_records(encoded: &str) -> Result<Vec<IrradianceRecord>, TagError> {
    let binary = STANDARD
        .decode(encoded.trim())
        .map_err(|e| TagError::MalformedBlob {
            what: "irradiance list",
            reason: e.to_string(),
        })?;
    if binary.len() % RECORD_SIZE != 0 {
        return Err(TagError::MalformedBlob {
            what: "irradiance list",
            reason: format!("{} bytes is not a multiple of {}", binary.len(), RECORD_SIZE),
        });
    }
    binary.chunks_exact(RECORD_SIZE).map(IrradianceRecord::parse).collect()
}

/// Mean irradiance of the last one to three records.
fn sequoia_irradiance(calibration: &str, encoded: &str) -> Result<Option<f64>, TagError> {
    let calibration = sequoia_calibration(calibration)?;
    let records = decode_records(encoded)?;

    let recent = &records[records.len().saturating_sub(AVERAGED_RECORDS)..];
    if recent.is_empty() {
        return Ok(None);
    }
    let mut sum = 0.0;
    for record in recent {
        sum += record.irradiance(&calibration)?;
    }
    Ok(Some(sum / recent.len() as f64))
}

impl CameraMetadata {
    /// Irradiance reported by the sun sensor, if any.
    pub fn sun_sensor(&self) -> Option<f64> {
        match self.quirk {
            CameraQuirk::Sequoia => {
                let calibration = self.vendor.seq_irradiance_calibration.as_deref()?;
                let encoded = self.vendor.seq_irradiance_list.as_deref()?;
                match sequoia_irradiance(calibration, encoded) {
                    Ok(irradiance) => irradiance,
                    Err(error) => {
                        warn!(file = %self.filename, "Cannot decode Sequoia irradiance: {}", error);
                        None
                    }
                }
            }
            CameraQuirk::P4Multispectral => self.radiometry.sun_sensor,
            CameraQuirk::Generic => match self.radiometry.sun_sensor {
                Some(raw) => Some(raw / SUN_SENSOR_FULL_SCALE),
                None => {
                    let spectral = self.radiometry.spectral_irradiance?;
                    Some(spectral * self.radiometry.irradiance_scale_to_si.unwrap_or(1.0))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// Every tier maps a CH0 count of 600 at 600us to 1.0, except tier 1
    /// which needs 1200.
    const CALIBRATION: &str = "0,600,600,0,1,600,1200,0,2,600,600,0,3,600,600,0";

    fn record(ch0: u16, gain_index: u16, integration_time: u16) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(RECORD_SIZE);
        bytes.extend_from_slice(&1_600_000_000u64.to_le_bytes());
        bytes.extend_from_slice(&ch0.to_le_bytes());
        bytes.extend_from_slice(&7u16.to_le_bytes());
        bytes.extend_from_slice(&gain_index.to_le_bytes());
        bytes.extend_from_slice(&integration_time.to_le_bytes());
        for angle in [10.0f32, -2.5, 0.5] {
            bytes.extend_from_slice(&angle.to_le_bytes());
        }
        bytes
    }

    fn sequoia(records: &[Vec<u8>]) -> CameraMetadata {
        let mut meta = CameraMetadata::new("IMG_0001_NIR.TIF", 1280, 960).unwrap();
        meta.make = "Parrot".to_string();
        meta.model = "Sequoia".to_string();
        meta.quirk = CameraQuirk::Sequoia;
        meta.vendor.seq_irradiance_calibration = Some(CALIBRATION.to_string());
        meta.vendor.seq_irradiance_list = Some(STANDARD.encode(records.concat()));
        meta
    }

    #[test]
    fn test_record_layout() {
        let parsed = IrradianceRecord::parse(&record(1234, 2, 300)).unwrap();
        assert_eq!(
            parsed,
            IrradianceRecord {
                ch0: 1234,
                gain_index: 2,
                integration_time: 300,
            }
        );
        assert!(IrradianceRecord::parse(&record(1234, 2, 300)[..RECORD_SIZE - 1]).is_err());
    }

    #[test]
    fn test_no_records() {
        assert_eq!(sequoia(&[]).sun_sensor(), None);
    }

    #[test]
    fn test_single_record() {
        // 300 counts at 300us is 600 counts at 600us
        let meta = sequoia(&[record(300, 0, 300)]);
        assert_relative_eq!(meta.sun_sensor().unwrap(), 1.0);
    }

    #[test]
    fn test_two_records_averaged() {
        let meta = sequoia(&[record(600, 0, 600), record(1800, 0, 600)]);
        assert_relative_eq!(meta.sun_sensor().unwrap(), 2.0);
    }

    #[test]
    fn test_only_last_three_averaged() {
        let meta = sequoia(&[
            record(60000, 0, 600),
            record(600, 0, 600),
            record(600, 1, 600),
            record(1800, 0, 600),
        ]);
        // 1.0, 0.5 and 3.0
        assert_relative_eq!(meta.sun_sensor().unwrap(), 1.5);
    }

    #[test]
    fn test_truncated_log_is_rejected() {
        let mut meta = sequoia(&[record(600, 0, 600)]);
        let mut bytes = record(600, 0, 600);
        bytes.pop();
        meta.vendor.seq_irradiance_list = Some(STANDARD.encode(bytes));
        assert_eq!(meta.sun_sensor(), None);
        assert!(matches!(
            decode_records(meta.vendor.seq_irradiance_list.as_deref().unwrap()),
            Err(TagError::MalformedBlob { .. })
        ));
    }

    #[test]
    fn test_bad_gain_index_is_rejected() {
        let meta = sequoia(&[record(600, 4, 600)]);
        assert_eq!(meta.sun_sensor(), None);
    }

    #[test]
    fn test_missing_sequoia_blobs() {
        let mut meta = sequoia(&[record(600, 0, 600)]);
        meta.vendor.seq_irradiance_calibration = None;
        assert_eq!(meta.sun_sensor(), None);
    }

    #[test]
    fn test_short_calibration_is_rejected() {
        assert!(sequoia_calibration("0,600,600,0,1,600").is_err());
    }

    #[test]
    fn test_p4m_raw_value() {
        let mut meta = CameraMetadata::new("DJI_0011.TIF", 1600, 1300).unwrap();
        meta.quirk = CameraQuirk::P4Multispectral;
        meta.radiometry.sun_sensor = Some(4321.0);
        assert_eq!(meta.sun_sensor(), Some(4321.0));
    }

    #[test]
    fn test_generic_normalization() {
        let mut meta = CameraMetadata::new("IMG_0001_1.tif", 1280, 960).unwrap();
        assert_eq!(meta.sun_sensor(), None);

        meta.radiometry.spectral_irradiance = Some(1.2);
        meta.radiometry.irradiance_scale_to_si = Some(0.5);
        assert_relative_eq!(meta.sun_sensor().unwrap(), 0.6);

        meta.radiometry.sun_sensor = Some(65535.0);
        assert_eq!(meta.sun_sensor(), Some(1.0));
    }
}
