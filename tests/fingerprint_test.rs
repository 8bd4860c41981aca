use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

use imgcompare::duplicates::{distance, extract, FileDecoder, ImageDecoder, FINGERPRINT_LEN};

fn pattern(x: u32, y: u32) -> u8 {
    ((x * 7 + y * 3) % 200) as u8 + ((x / 8 + y / 8) % 2) as u8 * 50
}

#[test]
fn test_decoded_file_gives_42_finite_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("photo.png");
    RgbImage::from_fn(90, 60, |x, y| Rgb([pattern(x, y), pattern(y, x), 128]))
        .save(&path)
        .unwrap();

    let buffer = FileDecoder.decode(&path).unwrap();
    let fp = extract(&buffer).unwrap();
    assert_eq!(fp.values().len(), FINGERPRINT_LEN);
    assert!(fp.values().iter().all(|v| v.is_finite()));
    assert_eq!(extract(&buffer).unwrap(), fp);
}

#[test]
fn test_grayscale_file_matches_its_rgb_twin() {
    let dir = TempDir::new().unwrap();
    let gray_path = dir.path().join("gray.png");
    let rgb_path = dir.path().join("rgb.png");

    GrayImage::from_fn(40, 30, |x, y| Luma([pattern(x, y)]))
        .save(&gray_path)
        .unwrap();
    RgbImage::from_fn(40, 30, |x, y| {
        let v = pattern(x, y);
        Rgb([v, v, v])
    })
    .save(&rgb_path)
    .unwrap();

    let gray = FileDecoder.decode(&gray_path).unwrap();
    let rgb = FileDecoder.decode(&rgb_path).unwrap();
    assert_eq!(gray.channels(), 1);
    assert_eq!(rgb.channels(), 3);
    assert_eq!(distance(&extract(&gray).unwrap(), &extract(&rgb).unwrap()), 0.0);
}

#[test]
fn test_alpha_channel_is_ignored() {
    let dir = TempDir::new().unwrap();
    let opaque = dir.path().join("opaque.png");
    let translucent = dir.path().join("translucent.png");

    RgbaImage::from_fn(32, 32, |x, y| Rgba([pattern(x, y), 10, 200, 255]))
        .save(&opaque)
        .unwrap();
    RgbaImage::from_fn(32, 32, |x, y| Rgba([pattern(x, y), 10, 200, (x * 8) as u8]))
        .save(&translucent)
        .unwrap();

    let a = FileDecoder.decode(&opaque).unwrap();
    let b = FileDecoder.decode(&translucent).unwrap();
    assert_eq!(a.channels(), 4);
    assert_eq!(extract(&a).unwrap(), extract(&b).unwrap());
}

#[test]
fn test_distance_is_symmetric_on_real_images() {
    let a = RgbImage::from_fn(50, 50, |x, y| Rgb([pattern(x, y), 0, 0]));
    let b = RgbImage::from_fn(70, 40, |x, y| Rgb([0, pattern(x, y), 90]));
    let to_buf = |img: &RgbImage| {
        imgcompare::duplicates::PixelBuffer::new(img.width(), img.height(), 3, img.as_raw().clone()).unwrap()
    };
    let fa = extract(&to_buf(&a)).unwrap();
    let fb = extract(&to_buf(&b)).unwrap();

    assert_eq!(distance(&fa, &fb), distance(&fb, &fa));
    assert!(distance(&fa, &fb) > 0.0);
    assert_eq!(distance(&fa, &fa), 0.0);
}
