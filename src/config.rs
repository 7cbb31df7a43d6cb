use std::{fs::File, io::BufReader, path::Path};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::viewport::{DEFAULT_DEGENERATE_MARGIN, DEFAULT_PADDING_FRACTION};

/// Radius used when the radius input is missing, unparseable, or not positive.
pub const DEFAULT_RADIUS: f64 = 1000.0;

/// Attribute columns carried by new zones and blocks (household, person, worker and
/// employment counts for the 2019 and 2049 horizons).
pub const ATTRIBUTE_FIELDS: [&str; 8] = [
    "HH19", "PERSNS19", "WORKRS19", "EMP19",
    "HH49", "PERSNS49", "WORKRS49", "EMP49",
];

/// Tunables for a `Session`. Every key is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub default_radius: f64,
    pub padding_fraction: f64,
    pub degenerate_margin: f64,
    pub buffer_segments: usize,
    pub attribute_fields: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_radius: DEFAULT_RADIUS,
            padding_fraction: DEFAULT_PADDING_FRACTION,
            degenerate_margin: DEFAULT_DEGENERATE_MARGIN,
            buffer_segments: 64,
            attribute_fields: ATTRIBUTE_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SessionConfig {
    /// Read a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the numeric tunables are usable.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.default_radius.is_finite() && self.default_radius > 0.0,
            "default_radius must be a positive number, found {}", self.default_radius);
        ensure!(self.padding_fraction.is_finite() && self.padding_fraction >= 0.0,
            "padding_fraction must be non-negative, found {}", self.padding_fraction);
        ensure!(self.degenerate_margin.is_finite() && self.degenerate_margin > 0.0,
            "degenerate_margin must be positive, found {}", self.degenerate_margin);
        ensure!(self.buffer_segments >= 3,
            "buffer_segments must be at least 3, found {}", self.buffer_segments);
        Ok(())
    }
}
