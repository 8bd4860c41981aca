use std::path::Path;

use image::DynamicImage;

use super::buffer::PixelBuffer;
use crate::common::errors::{ScanError, ScanResult};

/// Turns an image path into a decoded 8-bit pixel buffer.
///
/// Implementations must fail with an error instead of returning an unusable
/// buffer. They are shared across worker threads.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> ScanResult<PixelBuffer>;
}

impl<F> ImageDecoder for F
where
    F: Fn(&Path) -> ScanResult<PixelBuffer> + Send + Sync,
{
    fn decode(&self, path: &Path) -> ScanResult<PixelBuffer> {
        self(path)
    }
}

/// Decoder backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> ScanResult<PixelBuffer> {
        let img = image::open(path).map_err(|e| ScanError::decode(path, e.to_string()))?;
        let buffer = from_dynamic(img).map_err(|e| e.with_path(path))?;
        if buffer.is_empty() {
            return Err(ScanError::decode(path, "image has no pixels"));
        }
        Ok(buffer)
    }
}

/// Convert any decoded image to 8-bit gray, RGB or RGBA.
///
/// Gray+alpha keeps only the gray plane; deeper sample types are scaled down.
pub fn from_dynamic(img: DynamicImage) -> ScanResult<PixelBuffer> {
    let color = img.color();
    let (width, height) = (img.width(), img.height());

    if color.channel_count() <= 2 {
        let gray = match img {
            DynamicImage::ImageLuma8(buf) => buf,
            other => other.to_luma8(),
        };
        PixelBuffer::new(width, height, 1, gray.into_raw())
    } else if color.has_alpha() {
        let rgba = match img {
            DynamicImage::ImageRgba8(buf) => buf,
            other => other.to_rgba8(),
        };
        PixelBuffer::new(width, height, 4, rgba.into_raw())
    } else {
        let rgb = match img {
            DynamicImage::ImageRgb8(buf) => buf,
            other => other.to_rgb8(),
        };
        PixelBuffer::new(width, height, 3, rgb.into_raw())
    }
}
