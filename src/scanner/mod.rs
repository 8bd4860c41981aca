//! Image source enumeration.

pub mod walker;

pub use walker::{collect_images, expand_home, has_extension};
