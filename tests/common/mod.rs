mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from whitespots for tests
pub use whitespots::{
    Analysis, AnalysisResult, AnalyzerConfig, AreaConvention, Connectivity, CoverageAnalyzer,
    InvalidInput, Threshold,
};
