/// Vendor-specific behaviour for derived radiometric values.
///
/// Decided once from the resolved make and model; the derived getters dispatch
/// on it instead of comparing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraQuirk {
    /// Parrot Sequoia: sensor-model CSV and packed sun-sensor log.
    Sequoia,
    /// DJI Phantom 4 Multispectral (FC6360): dedicated gain and black-current tags.
    P4Multispectral,
    #[default]
    Generic,
}

impl CameraQuirk {
    pub fn detect(make: &str, model: &str) -> Self {
        match (make, model) {
            ("Parrot", "Sequoia") => CameraQuirk::Sequoia,
            ("DJI", "FC6360") => CameraQuirk::P4Multispectral,
            _ => CameraQuirk::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(CameraQuirk::detect("Parrot", "Sequoia"), CameraQuirk::Sequoia);
        assert_eq!(CameraQuirk::detect("DJI", "FC6360"), CameraQuirk::P4Multispectral);
        assert_eq!(CameraQuirk::detect("DJI", "FC6310"), CameraQuirk::Generic);
        assert_eq!(CameraQuirk::detect("parrot", "sequoia"), CameraQuirk::Generic);
    }
}
