//! Pixel-level preprocessing for fingerprint extraction.
//!
//! All routines operate on 8-bit planes and round back to `u8` after every
//! stage, so the output is a pure function of the input bytes.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

/// Edge length of the square every image is resampled to
pub const CANONICAL_SIZE: u32 = 512;

/// Resample to the canonical 512x512 with a cubic (Catmull-Rom) filter
pub fn resize_canonical(img: &RgbImage) -> RgbImage {
    if img.dimensions() == (CANONICAL_SIZE, CANONICAL_SIZE) {
        return img.clone();
    }
    imageops::resize(img, CANONICAL_SIZE, CANONICAL_SIZE, FilterType::CatmullRom)
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge
/// sample (`gfedcb|abcdefgh|gfedcba`).
pub(crate) fn reflect101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = i;
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

/// 3x3 Gaussian smoothing.
///
/// With sigma derived from the kernel size the 3-tap kernel is exactly
/// `[1, 2, 1] / 4`, so this runs in integers and rounds once at the end.
pub fn gaussian_blur_3x3(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    let (w, h) = (w as usize, h as usize);
    let src = img.as_raw();

    // horizontal pass, values scaled by 4
    let mut horiz = vec![0u16; src.len()];
    for y in 0..h {
        let row = y * w * 3;
        for x in 0..w {
            let l = reflect101(x as isize - 1, w);
            let r = reflect101(x as isize + 1, w);
            for c in 0..3 {
                horiz[row + x * 3 + c] = src[row + l * 3 + c] as u16
                    + 2 * src[row + x * 3 + c] as u16
                    + src[row + r * 3 + c] as u16;
            }
        }
    }

    // vertical pass, values scaled by 16
    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        let up = reflect101(y as isize - 1, h) * w * 3;
        let down = reflect101(y as isize + 1, h) * w * 3;
        let row = y * w * 3;
        for i in 0..w * 3 {
            let sum = horiz[up + i] as u32 + 2 * horiz[row + i] as u32 + horiz[down + i] as u32;
            out[row + i] = ((sum + 8) >> 4) as u8;
        }
    }

    RgbImage::from_raw(w as u32, h as u32, out).unwrap_or_else(|| img.clone())
}

fn saturate(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Hue/saturation/value of one RGB pixel in 8-bit form.
///
/// Hue is degrees / 2 in `0..180`; saturation and value span `0..=255`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (ri, gi, bi) = (r as i32, g as i32, b as i32);
    let v = ri.max(gi).max(bi);
    let min = ri.min(gi).min(bi);
    let diff = v - min;

    let s = if v == 0 {
        0
    } else {
        ((diff * 255 + v / 2) / v) as u8
    };

    let h = if diff == 0 {
        0
    } else {
        let d = diff as f64;
        let raw = if v == ri {
            (gi - bi) as f64 * 30.0 / d
        } else if v == gi {
            (bi - ri) as f64 * 30.0 / d + 60.0
        } else {
            (ri - gi) as f64 * 30.0 / d + 120.0
        };
        // halves round toward +inf, as the fixed-point 8-bit conversion does
        let mut h = (raw + 0.5).floor() as i32;
        if h < 0 {
            h += 180;
        }
        if h >= 180 {
            h -= 180;
        }
        h as u8
    };

    [h, s, v as u8]
}

/// Luma and chroma of one RGB pixel, in Y, Cr, Cb order
pub fn rgb_to_ycrcb(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cr = (r - y) * 0.713 + 128.0;
    let cb = (b - y) * 0.564 + 128.0;
    [saturate(y), saturate(cr), saturate(cb)]
}

/// Convert every pixel with `f` and split the result into three planes
pub fn split_converted(img: &RgbImage, f: fn(u8, u8, u8) -> [u8; 3]) -> [GrayImage; 3] {
    let (w, h) = img.dimensions();
    let mut planes = [
        GrayImage::new(w, h),
        GrayImage::new(w, h),
        GrayImage::new(w, h),
    ];
    for (x, y, px) in img.enumerate_pixels() {
        let converted = f(px[0], px[1], px[2]);
        for (plane, value) in planes.iter_mut().zip(converted) {
            plane.put_pixel(x, y, image::Luma([value]));
        }
    }
    planes
}

/// Normalized 1-D Gaussian kernel of odd length `ksize`
pub fn gaussian_kernel(ksize: usize, sigma: f64) -> Vec<f64> {
    let half = (ksize / 2) as f64;
    let mut kernel: Vec<f64> = (0..ksize)
        .map(|i| {
            let x = i as f64 - half;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

/// Separable Gaussian blur of a floating-point plane, reflect-101 borders
pub fn gaussian_blur_f64(plane: &[f64], width: usize, height: usize, kernel: &[f64]) -> Vec<f64> {
    let half = (kernel.len() / 2) as isize;

    let mut horiz = vec![0.0; plane.len()];
    for y in 0..height {
        let row = y * width;
        for x in 0..width {
            horiz[row + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let sx = reflect101(x as isize + k as isize - half, width);
                    weight * plane[row + sx]
                })
                .sum();
        }
    }

    let mut out = vec![0.0; plane.len()];
    for y in 0..height {
        for x in 0..width {
            out[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let sy = reflect101(y as isize + k as isize - half, height);
                    weight * horiz[sy * width + x]
                })
                .sum();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_reflect101() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(2, 5), 2);
        assert_eq!(reflect101(-1, 1), 0);
    }

    #[test]
    fn test_resize_is_canonical() {
        let img = RgbImage::from_pixel(37, 13, Rgb([10, 20, 30]));
        let resized = resize_canonical(&img);
        assert_eq!(resized.dimensions(), (512, 512));
        let expected = [10i16, 20, 30];
        assert!(resized
            .pixels()
            .all(|p| (0..3).all(|c| (p[c] as i16 - expected[c]).abs() <= 1)));
    }

    #[test]
    fn test_blur_keeps_flat_image() {
        let img = RgbImage::from_pixel(8, 8, Rgb([200, 100, 50]));
        assert_eq!(gaussian_blur_3x3(&img), img);
    }

    #[test]
    fn test_blur_spreads_single_pixel() {
        let mut img = RgbImage::new(5, 5);
        img.put_pixel(2, 2, Rgb([160, 0, 0]));
        let blurred = gaussian_blur_3x3(&img);
        assert_eq!(blurred.get_pixel(2, 2)[0], 40);
        assert_eq!(blurred.get_pixel(1, 2)[0], 20);
        assert_eq!(blurred.get_pixel(1, 1)[0], 10);
        assert_eq!(blurred.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(rgb_to_hsv(255, 0, 0), [0, 255, 255]);
        assert_eq!(rgb_to_hsv(0, 255, 0), [60, 255, 255]);
        assert_eq!(rgb_to_hsv(0, 0, 255), [120, 255, 255]);
        assert_eq!(rgb_to_hsv(0, 0, 0), [0, 0, 0]);
        assert_eq!(rgb_to_hsv(128, 128, 128), [0, 0, 128]);
    }

    #[test]
    fn test_hsv_hue_wraps_below_zero() {
        // magenta-ish red: max is red, green < blue
        let [h, _, _] = rgb_to_hsv(255, 0, 10);
        assert!(h > 170 && h < 180);
    }

    #[test]
    fn test_hsv_negative_half_hue_rounds_up() {
        // raw hue is -2.5, which must land on 178 rather than 177
        assert_eq!(rgb_to_hsv(12, 0, 1), [178, 255, 12]);
        // positive half steps round up as well: 2.5 -> 3
        assert_eq!(rgb_to_hsv(12, 1, 0)[0], 3);
    }

    #[test]
    fn test_ycrcb_gray_has_neutral_chroma() {
        assert_eq!(rgb_to_ycrcb(100, 100, 100), [100, 128, 128]);
        assert_eq!(rgb_to_ycrcb(255, 255, 255), [255, 128, 128]);
    }

    #[test]
    fn test_ycrcb_red() {
        // Y = 76.245, Cr = 128 + 0.713 * 178.755, Cb = 128 - 0.564 * 76.245
        assert_eq!(rgb_to_ycrcb(255, 0, 0), [76, 255, 85]);
    }

    #[test]
    fn test_split_converted_layout() {
        let img = RgbImage::from_pixel(2, 3, Rgb([0, 0, 255]));
        let [h, s, v] = split_converted(&img, rgb_to_hsv);
        assert_eq!(h.dimensions(), (2, 3));
        assert!(h.pixels().all(|p| p[0] == 120));
        assert!(s.pixels().all(|p| p[0] == 255));
        assert!(v.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_gaussian_kernel_is_normalized() {
        let kernel = gaussian_kernel(11, 1.5);
        assert_eq!(kernel.len(), 11);
        assert!((kernel.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(kernel[5] > kernel[4] && kernel[4] == kernel[6]);
    }

    #[test]
    fn test_float_blur_keeps_constant_plane() {
        let plane = vec![3.0; 20 * 7];
        let kernel = gaussian_kernel(11, 1.5);
        let out = gaussian_blur_f64(&plane, 20, 7, &kernel);
        assert!(out.iter().all(|v| (v - 3.0).abs() < 1e-9));
    }
}
