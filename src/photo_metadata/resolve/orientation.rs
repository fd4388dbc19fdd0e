//! Yaw/pitch/roll to omega/phi/kappa conversion.
//!
//! The camera attitude is composed with a local frame anchored to geodetic
//! north: `C_eb = C_en · C_nb · C_bb`. Composition order and axis conventions
//! are load-bearing; a sign slip rotates every reconstructed scene.

use nalgebra::{Matrix3, Vector3};
use tracing::debug;

use crate::photo_metadata::common::diagnostics::{Diagnostics, Notice};
use crate::photo_metadata::common::error::GeometryError;
use crate::photo_metadata::external::geodetic::GeodeticConverter;
use crate::photo_metadata::model::types::CameraMetadata;
use crate::photo_metadata::resolve::config::ResolverConfig;

/// Exterior orientation angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opk {
    pub omega: f64,
    pub phi: f64,
    pub kappa: f64,
}

/// Body-to-camera permutation: X and Y swapped, Z negated. Top of the image
/// points along the flight direction and the camera looks down.
fn body_to_camera() -> Matrix3<f64> {
    Matrix3::new(
        0.0, 1.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 0.0, -1.0,
    )
}

/// Aerospace yaw-pitch-roll rotation, angles in radians.
fn navigation_from_body(yaw: f64, pitch: f64, roll: f64) -> Matrix3<f64> {
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sr, cr) = roll.sin_cos();

    Matrix3::new(
        cy * cp, cy * sp * sr - sy * cr, cy * sp * cr + sy * sr,
        sy * cp, sy * sp * sr + cy * cr, sy * sp * cr - cy * sr,
        -sp, cp * sr, cp * cr,
    )
}

/// Unit vector pointing north at the given position, in ECEF coordinates.
fn points_north<G: GeodeticConverter + ?Sized>(
    converter: &G,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    delta: f64,
) -> Result<Vector3<f64>, GeometryError> {
    let (x1, y1, z1) = converter.ecef_from_geodetic(latitude + delta, longitude, altitude);
    let (x2, y2, z2) = converter.ecef_from_geodetic(latitude - delta, longitude, altitude);
    let difference = Vector3::new(x1 - x2, y1 - y2, z1 - z2);

    let divider = difference.norm();
    if divider == 0.0 {
        return Err(GeometryError::DegenerateNorth);
    }
    Ok(difference / divider)
}

/// Converts a camera attitude at a geodetic position into OPK angles.
///
/// `position` is `(latitude, longitude, altitude)` and `ypr` is
/// `(yaw, pitch, roll)`, all angles in degrees. `north_delta` is the latitude
/// offset used to sample the north direction.
pub fn ypr_to_opk<G: GeodeticConverter + ?Sized>(
    converter: &G,
    position: (f64, f64, f64),
    ypr: (f64, f64, f64),
    north_delta: f64,
) -> Result<Opk, GeometryError> {
    let (latitude, longitude, altitude) = position;
    let (yaw, pitch, roll) = ypr;

    let cnb = navigation_from_body(yaw.to_radians(), pitch.to_radians(), roll.to_radians());
    let cbb = body_to_camera();

    let north = points_north(converter, latitude, longitude, altitude, north_delta)?;
    let down = Vector3::new(0.0, 0.0, -1.0);
    let east = down.cross(&north);
    let cen = Matrix3::from_columns(&[north, east, down]);

    let ceb = cen * cnb * cbb;

    // asin is undefined past ±1; rounding can push a unit component just over
    let phi = ceb[(0, 2)].clamp(-1.0, 1.0).asin();

    Ok(Opk {
        omega: (-ceb[(1, 2)]).atan2(ceb[(2, 2)]).to_degrees(),
        phi: phi.to_degrees(),
        kappa: (-ceb[(0, 1)]).atan2(ceb[(0, 0)]).to_degrees(),
    })
}

/// Derives OPK when both the attitude and the position are known. Anything
/// else leaves the angles untouched.
pub(crate) fn apply_opk<G: GeodeticConverter + ?Sized>(
    mut meta: CameraMetadata,
    converter: &G,
    config: &ResolverConfig,
    diagnostics: &mut Diagnostics,
) -> CameraMetadata {
    let (Some(ypr), Some(latitude), Some(longitude)) =
        (meta.pose.ypr(), meta.geo.latitude, meta.geo.longitude)
    else {
        return meta;
    };
    let altitude = meta.geo.altitude.unwrap_or(0.0);

    match ypr_to_opk(converter, (latitude, longitude, altitude), ypr, config.north_delta_degrees) {
        Ok(opk) => {
            debug!(omega = opk.omega, phi = opk.phi, kappa = opk.kappa, "OPK derived");
            meta.pose.omega = Some(opk.omega);
            meta.pose.phi = Some(opk.phi);
            meta.pose.kappa = Some(opk.kappa);
        }
        Err(error) => {
            debug!(file = %meta.filename, "OPK left unset: {}", error);
            diagnostics.push(Notice::DegenerateGeometry(error));
        }
    }
    meta
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::photo_metadata::external::geodetic::Wgs84;

    /// Treats latitude/longitude/altitude as plain xyz, so north is +X.
    struct FlatEarth;

    impl GeodeticConverter for FlatEarth {
        fn ecef_from_geodetic(&self, latitude: f64, longitude: f64, altitude: f64) -> (f64, f64, f64) {
            (latitude, longitude, altitude)
        }
    }

    struct Collapsed;

    impl GeodeticConverter for Collapsed {
        fn ecef_from_geodetic(&self, _: f64, _: f64, _: f64) -> (f64, f64, f64) {
            (1.0, 2.0, 3.0)
        }
    }

    const DELTA: f64 = 1e-7;

    #[test]
    fn test_level_attitude_flat_frame() {
        let opk = ypr_to_opk(&FlatEarth, (10.0, 20.0, 0.0), (0.0, 0.0, 0.0), DELTA).unwrap();
        assert_abs_diff_eq!(opk.omega, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(opk.phi, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(opk.kappa, -90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pitch_maps_to_phi() {
        let opk = ypr_to_opk(&FlatEarth, (10.0, 20.0, 0.0), (0.0, 10.0, 0.0), DELTA).unwrap();
        assert_abs_diff_eq!(opk.omega, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(opk.phi, -10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(opk.kappa, -90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_yaw_turns_kappa() {
        let opk = ypr_to_opk(&FlatEarth, (10.0, 20.0, 0.0), (90.0, 0.0, 0.0), DELTA).unwrap();
        assert_abs_diff_eq!(opk.omega, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(opk.phi, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(opk.kappa.abs(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_level_attitude_wgs84_is_nadir() {
        let opk = ypr_to_opk(&Wgs84, (46.5, 6.6, 400.0), (0.0, 0.0, 0.0), DELTA).unwrap();
        assert_abs_diff_eq!(opk.omega, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(opk.phi, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_north() {
        let result = ypr_to_opk(&Collapsed, (10.0, 20.0, 0.0), (0.0, 0.0, 0.0), DELTA);
        assert_eq!(result, Err(GeometryError::DegenerateNorth));
    }

    fn positioned(meta: &mut CameraMetadata) {
        meta.geo.latitude = Some(10.0);
        meta.geo.longitude = Some(20.0);
        meta.pose.yaw = Some(0.0);
        meta.pose.pitch = Some(10.0);
        meta.pose.roll = Some(0.0);
    }

    #[test]
    fn test_apply_sets_all_three() {
        let mut meta = CameraMetadata::new("a.jpg", 4, 3).unwrap();
        positioned(&mut meta);
        let mut diagnostics = Diagnostics::new();
        let meta = apply_opk(meta, &FlatEarth, &ResolverConfig::default(), &mut diagnostics);

        let (omega, phi, kappa) = meta.pose().opk().unwrap();
        assert_abs_diff_eq!(omega, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(phi, -10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(kappa, -90.0, epsilon = 1e-9);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_apply_without_position_is_noop() {
        let mut meta = CameraMetadata::new("a.jpg", 4, 3).unwrap();
        positioned(&mut meta);
        meta.geo.latitude = None;
        meta.geo.longitude = None;
        let meta = apply_opk(meta, &FlatEarth, &ResolverConfig::default(), &mut Diagnostics::new());
        assert!(!meta.has_opk());
    }

    #[test]
    fn test_apply_without_full_attitude_is_noop() {
        let mut meta = CameraMetadata::new("a.jpg", 4, 3).unwrap();
        positioned(&mut meta);
        meta.pose.roll = None;
        let meta = apply_opk(meta, &FlatEarth, &ResolverConfig::default(), &mut Diagnostics::new());
        assert!(!meta.has_opk());
    }

    #[test]
    fn test_apply_degenerate_records_notice() {
        let mut meta = CameraMetadata::new("a.jpg", 4, 3).unwrap();
        positioned(&mut meta);
        let mut diagnostics = Diagnostics::new();
        let meta = apply_opk(meta, &Collapsed, &ResolverConfig::default(), &mut diagnostics);

        assert!(!meta.has_opk());
        assert_eq!(
            diagnostics.notices(),
            &[Notice::DegenerateGeometry(GeometryError::DegenerateNorth)]
        );
    }
}
