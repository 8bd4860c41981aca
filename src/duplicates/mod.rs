pub mod buffer;
pub mod cluster;
pub mod decode;
pub mod filters;
pub mod fingerprint;
pub mod grouper;
pub mod moments;
pub mod progress;
pub mod quality;

pub use buffer::PixelBuffer;
pub use cluster::{duplicates_only, Assignment, ClusterId, DuplicateCluster, DuplicateClusterer, ImageRecord, SimilarityThreshold};
pub use decode::{FileDecoder, ImageDecoder};
pub use fingerprint::{distance, extract, Fingerprint, FINGERPRINT_LEN};
pub use grouper::{find_duplicates, CancelToken, ScanConfig, ScanReport, Scanner, SkippedImage};
pub use progress::{ProgressTracker, ScanEvent};
