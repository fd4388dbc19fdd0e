//! Sensor width lookup keyed by normalized "make model".

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::photo_metadata::common::error::{MetadataError, Result};

pub trait SensorDatabase {
    /// Physical sensor width in millimeters.
    fn sensor_width(&self, key: &str) -> Option<f64>;
}

/// Builds the lookup key: make stripped from the model, lowercased,
/// whitespace collapsed.
pub fn sensor_key(make: &str, model: &str) -> String {
    let model = if make != "unknown" && !make.is_empty() {
        model.replace(make, "")
    } else {
        model.to_string()
    };

    format!("{} {}", make.trim(), model.trim())
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// In-memory sensor table, loadable from a `{"make model": width_mm}` JSON map.
#[derive(Debug, Clone, Default)]
pub struct SensorTable {
    widths: HashMap<String, f64>,
}

impl SensorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, f64> = serde_json::from_str(json)
            .map_err(|e| MetadataError::SensorTableError(e.to_string()))?;
        Ok(raw.into_iter().collect())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MetadataError::SensorTableError(format!("{}: {}", path.display(), e))
        })?;
        let table = Self::from_json_str(&json)?;
        debug!("Loaded {} sensor widths from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn insert(&mut self, key: &str, width_mm: f64) {
        self.widths.insert(normalize(key), width_mm);
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

impl FromIterator<(String, f64)> for SensorTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut table = SensorTable::new();
        for (key, width) in iter {
            table.insert(&key, width);
        }
        table
    }
}

impl SensorDatabase for SensorTable {
    fn sensor_width(&self, key: &str) -> Option<f64> {
        self.widths.get(&normalize(key)).copied()
    }
}

fn normalize(key: &str) -> String {
    key.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}
