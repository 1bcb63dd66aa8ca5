use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use tempfile::NamedTempFile;

pub const BLACK: u8 = 0;
pub const WHITE: u8 = 255;

/// Uniform grayscale image
pub fn solid_gray(width: u32, height: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
}

/// Black RGB image with white axis-aligned rectangles `(x, y, w, h)` on it
pub fn rgb_with_squares(width: u32, height: u32, squares: &[(u32, u32, u32, u32)]) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let inside = squares
            .iter()
            .any(|&(sx, sy, w, h)| x >= sx && x < sx + w && y >= sy && y < sy + h);
        if inside {
            Rgb([WHITE, WHITE, WHITE])
        } else {
            Rgb([BLACK, BLACK, BLACK])
        }
    });
    DynamicImage::ImageRgb8(img)
}

/// Deterministic noisy grayscale image (linear congruential generator)
pub fn noise_gray(width: u32, height: u32, seed: u32) -> DynamicImage {
    let mut state = seed;
    let img = GrayImage::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        Luma([(state >> 16) as u8])
    });
    DynamicImage::ImageLuma8(img)
}

/// Writes an image to a temp PNG file; the file is removed when dropped.
pub fn write_temp_png(img: &DynamicImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

pub fn analyze_with_threshold(img: &DynamicImage, threshold: u8) -> whitespots::Analysis {
    whitespots::CoverageAnalyzer::default()
        .with_threshold(whitespots::Threshold::new(threshold))
        .analyze(img)
        .expect("Analysis failed")
}
