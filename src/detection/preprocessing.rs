use image::{DynamicImage, GrayImage, Luma};

use crate::config::Threshold;
use crate::models::Mask;

/// Fixed-point weights for Y = 0.299*R + 0.587*G + 0.114*B, scaled by 2^14
const COEF_R: u32 = 4899;
const COEF_G: u32 = 9617;
const COEF_B: u32 = 1868;
const SHIFT: u32 = 14;

/// Convert image to grayscale
///
/// 8-bit grayscale input is used as-is; everything else goes through RGB
/// and is weighted by luminance. Alpha is ignored.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = img {
        return gray.clone();
    }

    let rgb = img.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luminance(r, g, b)])
    })
}

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let weighted = COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32;
    ((weighted + (1 << (SHIFT - 1))) >> SHIFT) as u8
}

/// Mark every pixel whose intensity is at or above the threshold
pub fn binarize(gray: &GrayImage, threshold: Threshold) -> Mask {
    let cutoff = threshold.value();
    let mut mask = Mask::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        if pixel[0] >= cutoff {
            mask.set(x, y, true);
        }
    }
    mask
}
