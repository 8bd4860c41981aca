use std::fmt;

use image::RgbImage;

use super::buffer::PixelBuffer;
use super::filters;
use super::moments::{hu_moments, HU_COUNT};
use crate::common::errors::ScanResult;

/// Channels per colour representation
const CHANNELS: usize = 3;

/// Values in a fingerprint: 7 Hu moments x 3 channels x 2 colour spaces
pub const FINGERPRINT_LEN: usize = HU_COUNT * CHANNELS * 2;

/// Offset of the luma/chroma block
const YCRCB_OFFSET: usize = HU_COUNT * CHANNELS;

/// Scale applied to the L2 norm so near-duplicates land in a 0-100 range
pub const DISTANCE_SCALE: f64 = 10_000.0;

/// Moment-based colour fingerprint of an image.
///
/// Positions 0-20 hold the Hu moments of the H, S and V planes, positions
/// 21-41 those of the Y, Cr and Cb planes, each channel contributing 7
/// consecutive values.
#[derive(Clone, PartialEq)]
pub struct Fingerprint([f64; FINGERPRINT_LEN]);

impl Fingerprint {
    pub fn from_values(values: [f64; FINGERPRINT_LEN]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; FINGERPRINT_LEN] {
        &self.0
    }

    /// Scaled Euclidean distance; symmetric, zero only for equal fingerprints
    pub fn distance(&self, other: &Fingerprint) -> f64 {
        distance(self, other)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// `||a - b||_2 * 10000`
pub fn distance(a: &Fingerprint, b: &Fingerprint) -> f64 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
        * DISTANCE_SCALE
}

/// Normalize, resample and smooth a decoded image into the canonical
/// 512x512 RGB form both fingerprints and quality metrics work on.
pub fn prepare(buffer: &PixelBuffer) -> ScanResult<RgbImage> {
    let rgb = buffer.to_rgb()?;
    let resized = filters::resize_canonical(&rgb);
    Ok(filters::gaussian_blur_3x3(&resized))
}

/// Compute the 42-value fingerprint of a decoded image.
///
/// Fails only for buffers that are empty or have an unsupported channel count.
pub fn extract(buffer: &PixelBuffer) -> ScanResult<Fingerprint> {
    let smoothed = prepare(buffer)?;

    let mut values = [0.0; FINGERPRINT_LEN];
    let spaces: [(usize, fn(u8, u8, u8) -> [u8; 3]); 2] = [
        (0, filters::rgb_to_hsv),
        (YCRCB_OFFSET, filters::rgb_to_ycrcb),
    ];

    for (offset, convert) in spaces {
        let planes = filters::split_converted(&smoothed, convert);
        for (c, plane) in planes.iter().enumerate() {
            let start = offset + c * HU_COUNT;
            values[start..start + HU_COUNT].copy_from_slice(&hu_moments(plane));
        }
    }

    Ok(Fingerprint(values))
}
