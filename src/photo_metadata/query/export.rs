//! Plain record handed to the reconstruction pipeline.

use serde::Serialize;

use crate::photo_metadata::model::projection::Projection;
use crate::photo_metadata::model::types::CameraMetadata;

/// Stand-in for an unset standard deviation. Never returned.
const DOP_UNSET: f64 = -9999.0;
/// Precision assumed for positions without a reported accuracy.
const DEFAULT_DOP: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GpsRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dop: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpkRecord {
    pub omega: f64,
    pub phi: f64,
    pub kappa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportView {
    pub make: String,
    pub model: String,
    pub width: u32,
    pub height: u32,
    pub projection_type: Projection,
    pub focal_ratio: f64,
    pub orientation: u16,
    /// Seconds since the Unix epoch, 0 when unknown.
    pub capture_time: f64,
    pub gps: GpsRecord,
    pub camera: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opk: Option<OpkRecord>,
}

impl CameraMetadata {
    /// Larger of the horizontal and vertical standard deviations, when positive.
    pub fn gps_dop(&self) -> Option<f64> {
        let mut dop = DOP_UNSET;
        if let Some(xy) = self.geo.gps_xy_stddev {
            dop = xy;
        }
        if let Some(z) = self.geo.gps_z_stddev {
            dop = dop.max(z);
        }
        (dop > 0.0).then_some(dop)
    }

    pub fn export_view(&self) -> ExportView {
        let gps = match (self.geo.latitude, self.geo.longitude) {
            (Some(latitude), Some(longitude)) => GpsRecord {
                latitude: Some(latitude),
                longitude: Some(longitude),
                altitude: Some(self.geo.altitude.unwrap_or(0.0)),
                dop: Some(self.gps_dop().unwrap_or(DEFAULT_DOP)),
            },
            _ => GpsRecord::default(),
        };

        ExportView {
            make: self.make.clone(),
            model: self.model.clone(),
            width: self.width,
            height: self.height,
            projection_type: self.projection,
            focal_ratio: self.focal_ratio,
            orientation: self.orientation,
            capture_time: self.capture.utc_time_ms.map_or(0.0, |ms| ms / 1000.0),
            gps,
            camera: self.camera_id(),
            opk: self.pose.opk().map(|(omega, phi, kappa)| OpkRecord { omega, phi, kappa }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn camera() -> CameraMetadata {
        let mut meta = CameraMetadata::new("DJI_0042.JPG", 4000, 3000).unwrap();
        meta.make = "DJI".to_string();
        meta.model = "FC6310".to_string();
        meta
    }

    #[test]
    fn test_gps_dop() {
        let mut meta = camera();
        assert_eq!(meta.gps_dop(), None);

        meta.geo.gps_xy_stddev = Some(2.0);
        meta.geo.gps_z_stddev = Some(5.0);
        assert_eq!(meta.gps_dop(), Some(5.0));

        meta.geo.gps_z_stddev = None;
        assert_eq!(meta.gps_dop(), Some(2.0));

        meta.geo.gps_xy_stddev = Some(0.0);
        assert_eq!(meta.gps_dop(), None);
    }

    #[test]
    fn test_export_without_position() {
        let view = camera().export_view();
        assert_eq!(view.gps, GpsRecord::default());
        assert_eq!(view.capture_time, 0.0);
        assert_eq!(view.opk, None);

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["gps"], json!({}));
        assert!(value.get("opk").is_none());
        assert_eq!(value["projection_type"], json!("brown"));
    }

    #[test]
    fn test_export_with_position_and_opk() {
        let mut meta = camera();
        meta.geo.latitude = Some(46.5);
        meta.geo.longitude = Some(6.6);
        meta.capture.utc_time_ms = Some(1_622_548_800_500.0);
        meta.pose.omega = Some(1.0);
        meta.pose.phi = Some(-2.0);
        meta.pose.kappa = Some(90.0);

        let value = serde_json::to_value(meta.export_view()).unwrap();
        assert_eq!(
            value,
            json!({
                "make": "DJI",
                "model": "FC6310",
                "width": 4000,
                "height": 3000,
                "projection_type": "brown",
                "focal_ratio": 0.85,
                "orientation": 1,
                "capture_time": 1_622_548_800.5,
                "gps": {"latitude": 46.5, "longitude": 6.6, "altitude": 0.0, "dop": 10.0},
                "camera": "v2 dji fc6310 4000 3000 brown 0.85",
                "opk": {"omega": 1.0, "phi": -2.0, "kappa": 90.0},
            })
        );
    }

    #[test]
    fn test_partial_opk_not_exported() {
        let mut meta = camera();
        meta.pose.omega = Some(1.0);
        meta.pose.phi = Some(-2.0);
        assert_eq!(meta.export_view().opk, None);
    }
}
