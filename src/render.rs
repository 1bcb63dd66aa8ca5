use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::{debug, info};

use crate::models::{Analysis, Region};

pub const ANNOTATED_FILENAME: &str = "output_original_image_with_contours.png";
pub const GRAYSCALE_FILENAME: &str = "output_grayscale_image.png";
pub const BINARY_FILENAME: &str = "output_binary_image.png";

/// Boundary colour for annotated images
pub const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
/// Boundary stroke width in pixels
pub const CONTOUR_THICKNESS: u32 = 2;

/// Paths of the images written by [`save_outputs`]
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub annotated: PathBuf,
    pub grayscale: PathBuf,
    pub binary: PathBuf,
}

/// Copy of the original with every region boundary drawn on top
///
/// Each boundary pixel is stamped with a square stroke centred on it; for
/// even widths the extra pixel lands above and to the left. Strokes are
/// clipped at the image edge.
pub fn annotate(img: &DynamicImage, regions: &[Region]) -> RgbImage {
    let mut canvas = img.to_rgb8();
    let offset = (CONTOUR_THICKNESS / 2) as i32;
    for region in regions {
        for point in &region.boundary {
            let rect = Rect::at(point.x as i32 - offset, point.y as i32 - offset)
                .of_size(CONTOUR_THICKNESS, CONTOUR_THICKNESS);
            draw_filled_rect_mut(&mut canvas, rect, CONTOUR_COLOR);
        }
    }
    canvas
}

/// Encode an RGB image as PNG bytes, e.g. for a download
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| anyhow::anyhow!("Failed to encode PNG: {}", e))?;
    Ok(bytes.into_inner())
}

/// Write the annotated, grayscale and binary images into `output_dir`.
///
/// All three images are rendered before anything touches the disk. If a
/// write fails, the files already written by this call are removed again.
pub fn save_outputs<P: AsRef<Path>>(
    img: &DynamicImage,
    analysis: &Analysis,
    output_dir: P,
) -> Result<OutputPaths> {
    let output_dir = output_dir.as_ref();

    let annotated = DynamicImage::ImageRgb8(annotate(img, &analysis.regions));
    let grayscale = DynamicImage::ImageLuma8(analysis.gray.clone());
    let binary = DynamicImage::ImageLuma8(analysis.mask.to_image());

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    let paths = OutputPaths {
        annotated: output_dir.join(ANNOTATED_FILENAME),
        grayscale: output_dir.join(GRAYSCALE_FILENAME),
        binary: output_dir.join(BINARY_FILENAME),
    };

    let outputs = [
        (&annotated, &paths.annotated, "annotated"),
        (&grayscale, &paths.grayscale, "grayscale"),
        (&binary, &paths.binary, "binary"),
    ];
    for (written, &(image, path, kind)) in outputs.iter().enumerate() {
        if let Err(e) = image.save(path) {
            for &(_, earlier, _) in &outputs[..written] {
                // Cleanup errors are dropped in favour of the save error
                let _ = std::fs::remove_file(earlier);
            }
            return Err(anyhow::anyhow!(
                "Failed to save {} image {}: {}",
                kind,
                path.display(),
                e
            ));
        }
        debug!(path = %path.display(), "Saved");
    }

    info!(dir = %output_dir.display(), "Wrote output images");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    #[test]
    fn test_annotate_draws_thick_boundary() {
        let img = DynamicImage::new_rgb8(6, 6);
        let region = Region {
            label: 1,
            min_x: 2,
            min_y: 2,
            max_x: 2,
            max_y: 2,
            pixel_count: 1,
            boundary: vec![Point { x: 2, y: 2 }],
            enclosed: false,
        };
        let annotated = annotate(&img, &[region]);
        assert_eq!(*annotated.get_pixel(2, 2), CONTOUR_COLOR);
        assert_eq!(*annotated.get_pixel(1, 1), CONTOUR_COLOR);
        assert_eq!(*annotated.get_pixel(1, 2), CONTOUR_COLOR);
        assert_eq!(*annotated.get_pixel(3, 3), Rgb([0, 0, 0]));
        assert_eq!(*annotated.get_pixel(3, 2), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_annotate_clips_at_border() {
        let img = DynamicImage::new_rgb8(3, 3);
        let region = Region {
            label: 1,
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            pixel_count: 1,
            boundary: vec![Point { x: 0, y: 0 }],
            enclosed: false,
        };
        let annotated = annotate(&img, &[region]);
        assert_eq!(*annotated.get_pixel(0, 0), CONTOUR_COLOR);
        assert_eq!(*annotated.get_pixel(1, 1), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_png(&RgbImage::new(2, 2)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
