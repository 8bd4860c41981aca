use std::path::PathBuf;

use thiserror::Error;

/// Typed errors for imgcompare operations.
/// We use `anyhow` at the top level for CLI error handling,
/// but per-image failures stay typed so a scan can skip and report them.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The decoder could not produce a usable pixel buffer
    #[error("Cannot decode '{}': {message}", path.display())]
    DecodeFailure { path: PathBuf, message: String },

    /// Decoded buffer has a channel count outside {1, 3, 4}
    #[error("Unsupported format for '{}': {channels} channels", path.display())]
    UnsupportedFormat { path: PathBuf, channels: u8 },

    /// Pixel data length does not match the declared geometry
    #[error("Invalid pixel buffer: {width}x{height}x{channels} needs {} bytes, got {len}", *width as usize * *height as usize * *channels as usize)]
    InvalidBuffer {
        width: u32,
        height: u32,
        channels: u8,
        len: usize,
    },

    /// Similarity percentage outside 0..=100
    #[error("Similarity must be between 0 and 100, got {0}")]
    InvalidSimilarity(f64),

    /// File system operation failed
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScanError::DecodeFailure {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attach a path to an error raised before the path was known
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            ScanError::DecodeFailure { message, .. } => ScanError::DecodeFailure {
                path: path.into(),
                message,
            },
            ScanError::UnsupportedFormat { channels, .. } => ScanError::UnsupportedFormat {
                path: path.into(),
                channels,
            },
            ScanError::InvalidBuffer { .. } => ScanError::DecodeFailure {
                path: path.into(),
                message: self.to_string(),
            },
            other => other,
        }
    }

    /// Short machine-readable kind, used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::DecodeFailure { .. } | ScanError::InvalidBuffer { .. } => "decode_failure",
            ScanError::UnsupportedFormat { .. } => "unsupported_format",
            ScanError::InvalidSimilarity(_) => "invalid_similarity",
            ScanError::Io { .. } => "io",
        }
    }
}

pub type ScanResult<T> = std::result::Result<T, ScanError>;
