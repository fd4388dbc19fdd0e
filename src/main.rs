use std::path::PathBuf;

use anyhow::{Context, bail};
use photo_meta_rs::logger;
use photo_meta_rs::photo_metadata::{JsonTagSource, MetadataResolver, ResolverConfig, SensorTable};

use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut args = std::env::args_os().skip(1);
    let Some(image) = args.next().map(PathBuf::from) else {
        bail!("usage: photo_meta_rs <image> [sensor-table.json]");
    };

    let sensors = match args.next() {
        Some(path) => SensorTable::from_json_file(&path)
            .with_context(|| format!("loading sensor table {}", PathBuf::from(&path).display()))?,
        None => SensorTable::new(),
    };
    info!("Sensor table: {} entries", sensors.len());

    let resolver = MetadataResolver::with_sensor_table(sensors, ResolverConfig::default());
    let tags = JsonTagSource::default();

    let resolved = resolver
        .resolve_file(&image, &tags)
        .with_context(|| format!("resolving {}", image.display()))?;
    if !resolved.is_clean() {
        warn!("{} notice(s) while resolving {}", resolved.notices.len(), image.display());
    }

    let view = resolved.value.export_view();
    println!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}
