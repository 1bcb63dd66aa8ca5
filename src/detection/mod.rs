pub mod contours;
pub mod labeling;
pub mod preprocessing;

use std::path::Path;

use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::config::{AnalyzerConfig, AreaConvention, Connectivity, Threshold};
use crate::error::InvalidInput;
use crate::models::{Analysis, AnalysisResult};

/// Measures how much of an image is covered by bright regions.
///
/// Holds only its configuration, so one analyzer can serve any number of
/// images, from any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageAnalyzer {
    config: AnalyzerConfig,
}

impl CoverageAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.config.connectivity = connectivity;
        self
    }

    pub fn with_area_convention(mut self, area: AreaConvention) -> Self {
        self.config.area = area;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run the full analysis on a decoded image
    pub fn analyze(&self, img: &DynamicImage) -> Result<Analysis, InvalidInput> {
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(InvalidInput::EmptyImage { width, height });
        }

        debug!(width, height, threshold = %self.config.threshold, "Converting to grayscale");
        let gray = preprocessing::to_grayscale(img);

        let mask = preprocessing::binarize(&gray, self.config.threshold);
        debug!(bright_pixels = mask.count(), "Binarized");

        let (labels, regions) = contours::find_regions(&mask, self.config.connectivity);
        debug!(regions = regions.len(), connectivity = ?self.config.connectivity, "Found regions");

        let total_area = width as u64 * height as u64;
        let spot_area: f64 = regions.iter().map(|r| r.area(self.config.area)).sum();
        let percentage = spot_area / total_area as f64 * 100.0;

        let result = AnalysisResult {
            threshold: self.config.threshold,
            width,
            height,
            total_area,
            spot_area,
            percentage,
            region_count: regions.len(),
            connectivity: self.config.connectivity,
            area_convention: self.config.area,
        };
        debug!(spot_area, percentage, "Analysis complete");

        Ok(Analysis {
            gray,
            mask,
            labels,
            regions,
            result,
        })
    }

    /// Decode encoded image bytes (PNG, JPEG, ...) and analyze them
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<(DynamicImage, Analysis), InvalidInput> {
        if bytes.is_empty() {
            return Err(InvalidInput::NoImageData);
        }
        let img = image::load_from_memory(bytes)?;
        let analysis = self.analyze(&img)?;
        Ok((img, analysis))
    }

    /// Read and decode an image file, then analyze it
    pub fn analyze_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<(DynamicImage, Analysis), InvalidInput> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading image");
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let analysis = self.analyze(&img)?;
        Ok((img, analysis))
    }
}
