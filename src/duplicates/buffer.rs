use image::RgbImage;

use crate::common::errors::{ScanError, ScanResult};

/// A decoded image: interleaved 8-bit samples, `channels` per pixel, row-major.
///
/// Channel layouts are grayscale (1), RGB (3) and RGBA (4). Other counts can be
/// constructed but are rejected by [`PixelBuffer::to_rgb`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> ScanResult<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected || channels == 0 {
            return Err(ScanError::InvalidBuffer {
                width,
                height,
                channels,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Normalize colour depth to 3 channels.
    ///
    /// RGBA drops alpha, grayscale is broadcast, RGB passes through.
    pub fn to_rgb(&self) -> ScanResult<RgbImage> {
        if self.is_empty() {
            return Err(ScanError::decode("", "empty pixel buffer"));
        }

        let rgb: Vec<u8> = match self.channels {
            3 => self.data.clone(),
            4 => self
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
            1 => self.data.iter().flat_map(|&v| [v, v, v]).collect(),
            channels => {
                return Err(ScanError::UnsupportedFormat {
                    path: Default::default(),
                    channels,
                })
            }
        };

        RgbImage::from_raw(self.width, self.height, rgb).ok_or(ScanError::InvalidBuffer {
            width: self.width,
            height: self.height,
            channels: 3,
            len: self.data.len(),
        })
    }
}
