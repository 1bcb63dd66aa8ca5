use thiserror::Error;

/// Reasons an analysis request is rejected before any work is done.
#[derive(Error, Debug)]
pub enum InvalidInput {
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("Threshold {0} is outside the valid range 0..=255")]
    ThresholdOutOfRange(i64),
    #[error("No image data was provided")]
    NoImageData,
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
}
