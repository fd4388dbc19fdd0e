//! Geodetic to Earth-centered-Earth-fixed conversion.

pub trait GeodeticConverter {
    /// `(x, y, z)` in meters for latitude/longitude in degrees and altitude in meters.
    fn ecef_from_geodetic(&self, latitude: f64, longitude: f64, altitude: f64) -> (f64, f64, f64);
}

/// WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wgs84;

impl Wgs84 {
    pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
    pub const SEMI_MINOR_AXIS: f64 = 6_356_752.314245;
}

impl GeodeticConverter for Wgs84 {
    fn ecef_from_geodetic(&self, latitude: f64, longitude: f64, altitude: f64) -> (f64, f64, f64) {
        let a2 = Self::SEMI_MAJOR_AXIS * Self::SEMI_MAJOR_AXIS;
        let b2 = Self::SEMI_MINOR_AXIS * Self::SEMI_MINOR_AXIS;
        let lat = latitude.to_radians();
        let lon = longitude.to_radians();
        let l = 1.0 / (a2 * lat.cos().powi(2) + b2 * lat.sin().powi(2)).sqrt();

        let x = (a2 * l + altitude) * lat.cos() * lon.cos();
        let y = (a2 * l + altitude) * lat.cos() * lon.sin();
        let z = (b2 * l + altitude) * lat.sin();
        (x, y, z)
    }
}
