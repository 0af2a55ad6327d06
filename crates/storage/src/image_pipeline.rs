//! Upload image processing.
//!
//! Every accepted upload is decoded, bounded to a maximum edge length
//! (never enlarged), re-encoded as JPEG, and paired with a square
//! centre-cropped thumbnail. CPU-bound; callers run it under
//! `tokio::task::spawn_blocking`.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType};

use crate::store::StorageError;

/// Resize bounds and JPEG quality settings.
#[derive(Debug, Clone, Copy)]
pub struct ImageLimits {
    /// Maximum edge length of the main image in pixels.
    pub max_edge: u32,
    /// Edge length of the square thumbnail in pixels.
    pub thumb_edge: u32,
    pub main_quality: u8,
    pub thumb_quality: u8,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_edge: 2000,
            thumb_edge: 400,
            main_quality: 90,
            thumb_quality: 80,
        }
    }
}

/// Output of the pipeline: JPEG bytes for both variants plus the final
/// dimensions of the main image.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub main: Vec<u8>,
    pub thumbnail: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode, bound, and re-encode an uploaded image.
pub fn process_image(data: &[u8], limits: &ImageLimits) -> Result<ProcessedImage, StorageError> {
    let img = image::load_from_memory(data).map_err(|e| StorageError::Image(e.to_string()))?;

    let main = if img.width() > limits.max_edge || img.height() > limits.max_edge {
        img.resize(limits.max_edge, limits.max_edge, FilterType::Lanczos3)
    } else {
        img.clone()
    };

    let thumbnail = img.resize_to_fill(limits.thumb_edge, limits.thumb_edge, FilterType::Triangle);

    Ok(ProcessedImage {
        width: main.width(),
        height: main.height(),
        main: encode_jpeg(&main, limits.main_quality)?,
        thumbnail: encode_jpeg(&thumbnail, limits.thumb_quality)?,
    })
}

/// Encode as baseline JPEG, flattening any alpha channel.
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, StorageError> {
    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| StorageError::Image(e.to_string()))?;
    Ok(out)
}
