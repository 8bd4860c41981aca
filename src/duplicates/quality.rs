//! Full-reference similarity metrics between two images.
//!
//! Both inputs are brought to the canonical 512x512 RGB form first, so images
//! of different sizes can be compared.

use image::RgbImage;

use super::buffer::PixelBuffer;
use super::filters::{self, gaussian_blur_f64, gaussian_kernel};
use crate::common::errors::ScanResult;

const SSIM_C1: f64 = 6.5025;
const SSIM_C2: f64 = 58.5225;
const SSIM_WINDOW: usize = 11;
const SSIM_SIGMA: f64 = 1.5;

fn canonical(buffer: &PixelBuffer) -> ScanResult<RgbImage> {
    Ok(filters::resize_canonical(&buffer.to_rgb()?))
}

/// Peak signal-to-noise ratio in dB; 0 when the images are identical
pub fn psnr(a: &PixelBuffer, b: &PixelBuffer) -> ScanResult<f64> {
    Ok(psnr_rgb(&canonical(a)?, &canonical(b)?))
}

fn psnr_rgb(a: &RgbImage, b: &RgbImage) -> f64 {
    let sse: f64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();

    if sse <= 1e-10 {
        return 0.0;
    }
    let mse = sse / a.as_raw().len() as f64;
    10.0 * ((255.0 * 255.0) / mse).log10()
}

/// Mean structural similarity per RGB channel, each in `[-1, 1]`
pub fn mssim(a: &PixelBuffer, b: &PixelBuffer) -> ScanResult<[f64; 3]> {
    Ok(mssim_rgb(&canonical(a)?, &canonical(b)?))
}

fn plane(img: &RgbImage, channel: usize) -> Vec<f64> {
    img.as_raw()
        .iter()
        .skip(channel)
        .step_by(3)
        .map(|&v| v as f64)
        .collect()
}

fn mssim_rgb(a: &RgbImage, b: &RgbImage) -> [f64; 3] {
    let (w, h) = a.dimensions();
    let (w, h) = (w as usize, h as usize);
    let kernel = gaussian_kernel(SSIM_WINDOW, SSIM_SIGMA);
    let blur = |p: &[f64]| gaussian_blur_f64(p, w, h, &kernel);

    let mut result = [0.0; 3];
    for (c, slot) in result.iter_mut().enumerate() {
        let i1 = plane(a, c);
        let i2 = plane(b, c);
        let product = |x: &[f64], y: &[f64]| -> Vec<f64> { x.iter().zip(y).map(|(p, q)| p * q).collect() };

        let mu1 = blur(&i1);
        let mu2 = blur(&i2);
        let sigma1_sq = blur(&product(&i1, &i1));
        let sigma2_sq = blur(&product(&i2, &i2));
        let sigma12 = blur(&product(&i1, &i2));

        let sum: f64 = (0..w * h)
            .map(|i| {
                let (m1, m2) = (mu1[i], mu2[i]);
                let s1 = sigma1_sq[i] - m1 * m1;
                let s2 = sigma2_sq[i] - m2 * m2;
                let s12 = sigma12[i] - m1 * m2;
                let num = (2.0 * m1 * m2 + SSIM_C1) * (2.0 * s12 + SSIM_C2);
                let den = (m1 * m1 + m2 * m2 + SSIM_C1) * (s1 + s2 + SSIM_C2);
                num / den
            })
            .sum();
        *slot = sum / (w * h) as f64;
    }
    result
}
