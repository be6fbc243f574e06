//! Image normalization for vision API payloads
//!
//! Accepts JPEG/PNG input, flattens any alpha channel onto a white
//! background, and re-encodes as base64 JPEG for the wire.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use thiserror::Error;

/// JPEG quality used for re-encoded payloads
const JPEG_QUALITY: u8 = 95;

/// Image input/normalization errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported or malformed image data: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result type for imaging operations
pub type ImageResult<T> = Result<T, ImageError>;

/// Decode image bytes (JPEG/PNG and other formats the image crate knows)
pub fn load_from_bytes(bytes: &[u8]) -> ImageResult<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Read and decode an image file
pub fn load_from_path<P: AsRef<Path>>(path: P) -> ImageResult<DynamicImage> {
    let bytes = std::fs::read(path)?;
    load_from_bytes(&bytes)
}

/// Decode a base64-encoded image payload
pub fn load_from_base64(data: &str) -> ImageResult<DynamicImage> {
    let bytes = BASE64.decode(data.trim())?;
    load_from_bytes(&bytes)
}

/// Encode an image as base64 JPEG for the vision API
///
/// Alpha is flattened onto white first; JPEG has no transparency.
pub fn to_jpeg_base64(image: &DynamicImage) -> ImageResult<String> {
    let rgb = flatten_alpha(image);
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;
    Ok(BASE64.encode(&buffer))
}

/// Composite an image over a white background, dropping alpha
fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb.clone(),
        _ => {
            let rgba = image.to_rgba8();
            let mut rgb = RgbImage::new(rgba.width(), rgba.height());
            for (x, y, pixel) in rgba.enumerate_pixels() {
                let alpha = pixel[3] as f32 / 255.0;
                let blend =
                    |channel: u8| (channel as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
                rgb.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
            }
            rgb
        }
    }
}
