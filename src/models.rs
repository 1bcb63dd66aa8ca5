use std::fmt;

use image::{GrayImage, Luma};
use serde::Serialize;

use crate::config::{AreaConvention, Connectivity, Threshold};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// Binary image: `true` where the pixel reached the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the value at (x, y); out-of-bounds reads are `false`.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[self.index(x, y)]
    }

    pub(crate) fn set(&mut self, x: u32, y: u32, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.index(x, y);
        self.data[index] = value;
    }

    /// Number of `true` pixels
    pub fn count(&self) -> u64 {
        self.data.iter().filter(|&&v| v).count() as u64
    }

    /// Render as an 8-bit image (255 for `true`, 0 for `false`).
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) { 255 } else { 0 }])
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Per-pixel region labels. 0 is background, `n` is the region with label `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: u32,
    height: u32,
    labels: Vec<u32>,
}

impl LabelMap {
    pub(crate) fn from_raw(width: u32, height: u32, labels: Vec<u32>) -> Self {
        debug_assert_eq!(labels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            labels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.labels[y as usize * self.width as usize + x as usize]
    }

    /// Signed lookup used by boundary tracing, where neighbours may fall
    /// outside the image.
    pub(crate) fn get_signed(&self, x: i64, y: i64) -> u32 {
        if x < 0 || y < 0 {
            return 0;
        }
        self.get(x as u32, y as u32)
    }
}

/// A maximal connected set of bright pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub label: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub pixel_count: u64,
    /// Outer boundary, clockwise from the top-most, left-most pixel
    pub boundary: Vec<Point>,
    /// Sits inside a hole of another region
    pub enclosed: bool,
}

impl Region {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Polygon area enclosed by the boundary, measured through pixel centres.
    ///
    /// Lines and single pixels enclose nothing and measure 0.
    pub fn contour_area(&self) -> f64 {
        let n = self.boundary.len();
        if n < 3 {
            return 0.0;
        }
        let twice_area: i64 = (0..n)
            .map(|i| {
                let a = self.boundary[i];
                let b = self.boundary[(i + 1) % n];
                a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
            })
            .sum();
        twice_area.abs() as f64 / 2.0
    }

    /// Area under the given convention.
    ///
    /// Under [`AreaConvention::Contour`] an enclosed region measures 0, since
    /// the outer contour around it already covers its pixels.
    pub fn area(&self, convention: AreaConvention) -> f64 {
        match convention {
            AreaConvention::Pixels => self.pixel_count as f64,
            AreaConvention::Contour if self.enclosed => 0.0,
            AreaConvention::Contour => self.contour_area(),
        }
    }
}

/// Numbers reported for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub threshold: Threshold,
    pub width: u32,
    pub height: u32,
    pub total_area: u64,
    pub spot_area: f64,
    pub percentage: f64,
    pub region_count: usize,
    pub connectivity: Connectivity,
    pub area_convention: AreaConvention,
}

impl AnalysisResult {
    /// Percentage with two decimals, e.g. "12.34%"
    pub fn percentage_text(&self) -> String {
        format!("{:.2}%", self.percentage)
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total area: {} pixels", self.total_area)?;
        writeln!(f, "White spots area: {} pixels", self.spot_area)?;
        write!(
            f,
            "Percentage of area occupied by white spots: {}",
            self.percentage_text()
        )
    }
}

/// Everything produced by one call to the analyzer.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub gray: GrayImage,
    pub mask: Mask,
    pub labels: LabelMap,
    pub regions: Vec<Region>,
    pub result: AnalysisResult,
}

impl Analysis {
    /// Region owning the pixel at (x, y), if any.
    pub fn region_at(&self, x: u32, y: u32) -> Option<&Region> {
        match self.labels.get(x, y) {
            0 => None,
            label => self.regions.get(label as usize - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_with_boundary(points: &[(u32, u32)]) -> Region {
        Region {
            label: 1,
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            pixel_count: points.len() as u64,
            boundary: points.iter().map(|&(x, y)| Point { x, y }).collect(),
            enclosed: false,
        }
    }

    #[test]
    fn test_contour_area_of_square() {
        let region = region_with_boundary(&[(2, 2), (3, 2), (3, 3), (2, 3)]);
        assert_eq!(region.contour_area(), 1.0);
        assert_eq!(region.area(AreaConvention::Pixels), 4.0);
    }

    #[test]
    fn test_enclosed_region_has_no_contour_area() {
        let mut region = region_with_boundary(&[(2, 2), (3, 2), (3, 3), (2, 3)]);
        region.enclosed = true;
        assert_eq!(region.area(AreaConvention::Contour), 0.0);
        assert_eq!(region.area(AreaConvention::Pixels), 4.0);
    }

    #[test]
    fn test_contour_area_of_line_is_zero() {
        let region = region_with_boundary(&[(0, 0), (1, 0), (2, 0), (1, 0)]);
        assert_eq!(region.contour_area(), 0.0);
    }

    #[test]
    fn test_mask_image_values() {
        let mut mask = Mask::new(2, 1);
        mask.set(1, 0, true);
        let img = mask.to_image();
        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(1, 0)[0], 255);
        assert_eq!(mask.count(), 1);
        assert!(!mask.get(5, 5));
    }

    #[test]
    fn test_report_lines() {
        let result = AnalysisResult {
            threshold: Threshold::default(),
            width: 10,
            height: 10,
            total_area: 100,
            spot_area: 4.0,
            percentage: 4.0,
            region_count: 1,
            connectivity: Connectivity::Eight,
            area_convention: AreaConvention::Pixels,
        };
        assert_eq!(
            result.to_string(),
            "Total area: 100 pixels\n\
             White spots area: 4 pixels\n\
             Percentage of area occupied by white spots: 4.00%"
        );
    }
}
