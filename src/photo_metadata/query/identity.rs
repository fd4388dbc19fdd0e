use chrono::{DateTime, Utc};

use crate::photo_metadata::model::types::CameraMetadata;

/// Version tag leading every camera id. Bump it when the id layout changes.
const CAMERA_ID_VERSION: &str = "v2";

/// Sensor resolution of the Mavic 2 Enterprise Advanced thermal camera.
const M2EA_THERMAL_MODEL: &str = "MAVIC2-ENTERPRISE-ADVANCED";
const M2EA_THERMAL_SIZE: (u32, u32) = (640, 512);

/// Groups the bands of a multi-camera capture.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureId {
    Uuid(String),
    Time(DateTime<Utc>),
}

impl CameraMetadata {
    /// Grouping key for photos taken by the same class of camera.
    pub fn camera_id(&self) -> String {
        let focal = format!("{:?}", self.focal_ratio);
        let focal: String = focal.chars().take(6).collect();

        format!(
            "{} {} {} {} {} {} {}",
            CAMERA_ID_VERSION,
            self.make.trim(),
            self.model.trim(),
            self.width,
            self.height,
            self.projection,
            focal
        )
        .to_lowercase()
    }

    pub fn utc_time(&self) -> Option<DateTime<Utc>> {
        let millis = self.capture.utc_time_ms?;
        DateTime::from_timestamp_micros((millis * 1000.0).round() as i64)
    }

    /// Capture UUID when the camera writes one, capture time otherwise.
    pub fn capture_id(&self) -> Option<CaptureId> {
        match &self.capture_uuid {
            Some(uuid) => Some(CaptureId::Uuid(uuid.clone())),
            None => self.utc_time().map(CaptureId::Time),
        }
    }

    pub fn is_thermal(&self) -> bool {
        if self.band_name.eq_ignore_ascii_case("LWIR") {
            return true;
        }
        self.make == "DJI"
            && self.model == M2EA_THERMAL_MODEL
            && (self.width, self.height) == M2EA_THERMAL_SIZE
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::photo_metadata::model::projection::Projection;

    fn camera(make: &str, model: &str, width: u32, height: u32) -> CameraMetadata {
        let mut meta = CameraMetadata::new("a.jpg", width, height).unwrap();
        meta.make = make.to_string();
        meta.model = model.to_string();
        meta
    }

    #[test]
    fn test_camera_id_layout() {
        let mut meta = camera(" DJI ", "FC6310 ", 5472, 3648);
        meta.focal_ratio = 0.6666666666666666;
        assert_eq!(meta.camera_id(), "v2 dji fc6310 5472 3648 brown 0.6666");

        meta.focal_ratio = 1.0;
        meta.projection = Projection::Fisheye;
        assert_eq!(meta.camera_id(), "v2 dji fc6310 5472 3648 fisheye 1.0");
    }

    #[test]
    fn test_camera_id_changes_with_each_camera_field() {
        let base = camera("DJI", "FC6310", 5472, 3648);
        let variants: [(&str, fn(&mut CameraMetadata)); 6] = [
            ("make", |m| m.make = "Hasselblad".to_string()),
            ("model", |m| m.model = "FC6360".to_string()),
            ("width", |m| m.width = 5471),
            ("height", |m| m.height = 3647),
            ("projection", |m| m.projection = Projection::Perspective),
            ("focal_ratio", |m| m.focal_ratio = 0.7),
        ];

        for (field, mutate) in variants {
            let mut changed = base.clone();
            mutate(&mut changed);
            assert_ne!(changed.camera_id(), base.camera_id(), "{} did not change the id", field);
        }
    }

    #[test]
    fn test_camera_id_ignores_per_photo_fields() {
        let a = camera("Parrot", "Sequoia", 1280, 960);
        let mut b = a.clone();
        b.filename = "b.tif".to_string();
        b.geo.latitude = Some(1.0);
        b.geo.longitude = Some(2.0);
        b.band_name = "NIR".to_string();
        assert_eq!(a.camera_id(), b.camera_id());
    }

    #[test]
    fn test_capture_id_prefers_uuid() {
        let mut meta = camera("DJI", "FC6360", 1600, 1300);
        meta.capture.utc_time_ms = Some(1_622_548_800_000.0);
        assert_eq!(
            meta.capture_id(),
            Some(CaptureId::Time(Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()))
        );

        meta.capture_uuid = Some("4f1c".to_string());
        assert_eq!(meta.capture_id(), Some(CaptureId::Uuid("4f1c".to_string())));
    }

    #[test]
    fn test_utc_time_keeps_milliseconds() {
        let mut meta = camera("DJI", "FC6310", 10, 10);
        meta.capture.utc_time_ms = Some(1_622_548_800_250.0);
        let time = meta.utc_time().unwrap();
        assert_eq!(time.timestamp_millis(), 1_622_548_800_250);
    }

    #[test]
    fn test_thermal() {
        assert!(camera("DJI", "MAVIC2-ENTERPRISE-ADVANCED", 640, 512).is_thermal());
        assert!(!camera("DJI", "MAVIC2-ENTERPRISE-ADVANCED", 8000, 6000).is_thermal());

        let mut lwir = camera("MicaSense", "Altum", 160, 120);
        lwir.band_name = "LWIR".to_string();
        assert!(lwir.is_thermal());

        lwir.band_name = "Red".to_string();
        assert!(!lwir.is_thermal());
    }
}
