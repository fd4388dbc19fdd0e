use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::photo_metadata::common::diagnostics::{Diagnostics, Resolved};
use crate::photo_metadata::common::error::{MetadataError, Result, TagError};
use crate::photo_metadata::external::geodetic::{GeodeticConverter, Wgs84};
use crate::photo_metadata::external::probe::{ExtensionProbe, ImageSizeProbe};
use crate::photo_metadata::external::sensor_db::{SensorDatabase, SensorTable};
use crate::photo_metadata::external::tag_source::TagSource;
use crate::photo_metadata::model::types::CameraMetadata;
use crate::photo_metadata::resolve::config::ResolverConfig;
use crate::photo_metadata::resolve::exif::resolve_exif;
use crate::photo_metadata::resolve::finalize::finalize;
use crate::photo_metadata::resolve::focal::apply_focal_ratio;
use crate::photo_metadata::resolve::orientation::apply_opk;
use crate::photo_metadata::resolve::xmp::resolve_xmp;
use crate::photo_metadata::tags::value::{ExifTags, XmpBlock};

/// Turns raw tags into a [`CameraMetadata`].
///
/// Stages run in a fixed order: EXIF, XMP, finalization, focal ratio,
/// orientation. Each stage consumes the record and returns it updated.
pub struct MetadataResolver<P: ImageSizeProbe, S: SensorDatabase, G: GeodeticConverter> {
    probe: P,
    sensors: S,
    geodetic: G,
    config: ResolverConfig,
}

impl MetadataResolver<ExtensionProbe, SensorTable, Wgs84> {
    /// Resolver with extension-based probing, an empty sensor table and WGS84.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            probe: ExtensionProbe,
            sensors: SensorTable::new(),
            geodetic: Wgs84,
            config,
        }
    }

    pub fn with_sensor_table(sensors: SensorTable, config: ResolverConfig) -> Self {
        Self {
            probe: ExtensionProbe,
            sensors,
            geodetic: Wgs84,
            config,
        }
    }
}

impl<P: ImageSizeProbe, S: SensorDatabase, G: GeodeticConverter> MetadataResolver<P, S, G> {
    pub fn with_custom(probe: P, sensors: S, geodetic: G, config: ResolverConfig) -> Self {
        Self {
            probe,
            sensors,
            geodetic,
            config,
        }
    }

    /// Probes the image size, reads its tags and resolves them.
    ///
    /// Only an unreadable image is fatal. A tag source failure is recorded as a
    /// notice and resolution continues with empty tags.
    #[instrument(skip(self, path, tags), fields(path = %path.display()))]
    pub fn resolve_file<T: TagSource + ?Sized>(&self, path: &Path, tags: &T) -> Result<Resolved<CameraMetadata>> {
        let (width, height) = {
            let _span = tracing::info_span!("probe_dimensions").entered();
            self.probe.probe(path)?
        };
        if width == 0 || height == 0 {
            return Err(MetadataError::CorruptedSource(format!(
                "{}: image reports {}x{} pixels",
                path.display(),
                width,
                height
            )));
        }

        let mut diagnostics = Diagnostics::new();
        let (exif, xmp) = {
            let _span = tracing::info_span!("read_tags").entered();
            let (exif, xmp) = tags.read_tags(path);
            let exif = exif.unwrap_or_else(|e| {
                diagnostics.tag_decode("EXIF", TagError::Unreadable(e.to_string()));
                ExifTags::new()
            });
            let xmp = xmp.unwrap_or_else(|e| {
                diagnostics.tag_decode("XMP", TagError::Unreadable(e.to_string()));
                Vec::new()
            });
            (exif, xmp)
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.resolve_with(filename, (width, height), &exif, &xmp, diagnostics)
    }

    /// Resolves already-decoded tags for a photo of known size.
    #[instrument(skip(self, exif, xmp), fields(exif_tags = exif.len(), xmp_blocks = xmp.len()))]
    pub fn resolve_tags(
        &self,
        filename: &str,
        dimensions: (u32, u32),
        exif: &ExifTags,
        xmp: &[XmpBlock],
    ) -> Result<Resolved<CameraMetadata>> {
        self.resolve_with(filename.to_string(), dimensions, exif, xmp, Diagnostics::new())
    }

    fn resolve_with(
        &self,
        filename: String,
        (width, height): (u32, u32),
        exif: &ExifTags,
        xmp: &[XmpBlock],
        mut diagnostics: Diagnostics,
    ) -> Result<Resolved<CameraMetadata>> {
        let mut meta = CameraMetadata::new(filename, width, height)?;
        meta.focal_ratio = self.config.default_focal_ratio;

        let meta = {
            let _span = tracing::info_span!("resolve_exif").entered();
            resolve_exif(meta, exif, &self.config, &mut diagnostics)
        };
        let meta = {
            let _span = tracing::info_span!("resolve_xmp").entered();
            resolve_xmp(meta, xmp, &self.config, &mut diagnostics)
        };
        let meta = finalize(meta, &mut diagnostics);
        let meta = {
            let _span = tracing::info_span!("focal_ratio").entered();
            apply_focal_ratio(meta, exif, xmp, &self.sensors, &self.config, &mut diagnostics)
        };
        let meta = {
            let _span = tracing::info_span!("orientation").entered();
            apply_opk(meta, &self.geodetic, &self.config, &mut diagnostics)
        };

        for notice in diagnostics.notices() {
            warn!(file = %meta.filename(), "{}", notice);
        }
        debug!("{}", meta);
        info!(
            width = meta.width(),
            height = meta.height(),
            notices = diagnostics.len(),
            "Metadata resolved"
        );

        Ok(Resolved::new(meta, diagnostics))
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ResolverConfig) {
        self.config = config;
    }

    pub fn sensors(&self) -> &S {
        &self.sensors
    }
}
