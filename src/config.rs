use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Default brightness cut-off for a "white" pixel.
pub const DEFAULT_THRESHOLD: u8 = 200;

/// Brightness threshold for 8-bit intensities.
///
/// Built from any integer so out-of-range input is reported instead of
/// silently wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Threshold(u8);

impl Threshold {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<i64> for Threshold {
    type Error = InvalidInput;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| InvalidInput::ThresholdOutOfRange(value))
    }
}

impl From<Threshold> for u8 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which neighbours join two bright pixels into the same region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// Left, right, up, down
    Four,
    /// The four above plus diagonals
    #[default]
    Eight,
}

/// How the area of a single region is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AreaConvention {
    /// Number of pixels in the region
    #[default]
    Pixels,
    /// Polygon area enclosed by the traced outer boundary
    Contour,
}

/// Per-request analyzer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub threshold: Threshold,
    pub connectivity: Connectivity,
    pub area: AreaConvention,
}

impl AnalyzerConfig {
    /// Load settings from a JSON file; missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }
}
