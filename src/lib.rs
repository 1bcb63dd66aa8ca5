pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod render;

pub use config::{AnalyzerConfig, AreaConvention, Connectivity, Threshold, DEFAULT_THRESHOLD};
pub use detection::CoverageAnalyzer;
pub use error::InvalidInput;
pub use models::{Analysis, AnalysisResult, LabelMap, Mask, Point, Region};
pub use render::{annotate, encode_png, save_outputs, OutputPaths};
