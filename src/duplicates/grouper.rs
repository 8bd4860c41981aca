use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::cluster::{self, ClusterId, DuplicateCluster, DuplicateClusterer, ImageRecord, SimilarityThreshold};
use super::decode::{FileDecoder, ImageDecoder};
use super::fingerprint::{self, Fingerprint};
use super::progress::{ProgressTracker, ScanEvent};
use crate::common::errors::{ScanError, ScanResult};
use crate::scanner;

/// Configuration for a folder scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Folder to enumerate
    pub root: PathBuf,
    /// Maximum fingerprint distance for a match
    pub threshold: SimilarityThreshold,
    /// Extensions treated as images
    pub extensions: Vec<String>,
    /// Descend into sub-folders
    pub recursive: bool,
    /// Fingerprint on the rayon pool; clustering stays sequential
    pub parallel: bool,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            threshold: SimilarityThreshold::default(),
            extensions: vec!["png".to_string(), "jpg".to_string()],
            recursive: false,
            parallel: true,
        }
    }
}

/// Shared flag checked between images; cancelling keeps the partial result
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An image left out of clustering, with the reason
#[derive(Debug)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub error: ScanError,
}

/// Complete results from a duplicate scan
#[derive(Debug)]
pub struct ScanReport {
    /// All clusters in creation order, including single-image ones
    pub clusters: Vec<DuplicateCluster>,
    /// Images that could not be fingerprinted, in scan order
    pub failures: Vec<SkippedImage>,
    /// Images handed to the scan
    pub images_total: usize,
    /// Images fingerprinted or skipped before the scan ended
    pub images_processed: usize,
    /// Images that made it into a cluster
    pub images_fingerprinted: usize,
    /// Threshold the scan ran with
    pub threshold: SimilarityThreshold,
    /// Scan duration in seconds
    pub duration_secs: f64,
    /// The scan stopped early on request
    pub cancelled: bool,
}

impl ScanReport {
    pub fn cluster(&self, id: ClusterId) -> Option<&DuplicateCluster> {
        self.clusters.get(id)
    }

    /// Clusters with at least one member, paired with their index
    pub fn duplicates_only(&self) -> Vec<(ClusterId, &DuplicateCluster)> {
        cluster::duplicates_only(&self.clusters)
    }

    /// Member entries across all clusters; an image in two clusters counts twice
    pub fn total_duplicates(&self) -> usize {
        self.clusters.iter().map(|c| c.member_count()).sum()
    }
}

/// Runs fingerprinting and clustering over an ordered list of paths
pub struct Scanner {
    decoder: Box<dyn ImageDecoder>,
    threshold: SimilarityThreshold,
    parallel: bool,
    cancel: CancelToken,
}

impl Scanner {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self {
            decoder: Box::new(FileDecoder),
            threshold,
            parallel: true,
            cancel: CancelToken::default(),
        }
    }

    pub fn with_decoder(mut self, decoder: impl ImageDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fingerprint and cluster `paths` in the given order.
    ///
    /// Emits one `Progress` event per image, preceded by `Skipped` for images
    /// that failed. Per-image failures never abort the scan.
    pub fn run<F>(&self, paths: &[PathBuf], mut on_event: F) -> ScanReport
    where
        F: FnMut(ScanEvent<'_>),
    {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new(paths.len());
        let mut clusterer = DuplicateClusterer::new(self.threshold);
        let mut failures = Vec::new();
        let mut fingerprinted = 0;
        let mut cancelled = false;

        info!(
            images = paths.len(),
            threshold = self.threshold.value(),
            parallel = self.parallel,
            "starting scan"
        );

        let batch = if self.parallel {
            (rayon::current_num_threads() * 2).max(1)
        } else {
            1
        };

        'batches: for chunk in paths.chunks(batch) {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let decoder = self.decoder.as_ref();
            let results: Vec<ScanResult<Fingerprint>> = if self.parallel && chunk.len() > 1 {
                chunk.par_iter().map(|p| fingerprint_path(decoder, p)).collect()
            } else {
                chunk.iter().map(|p| fingerprint_path(decoder, p)).collect()
            };

            // results are consumed in input order by the single clusterer
            for (path, result) in chunk.iter().zip(results) {
                if self.cancel.is_cancelled() {
                    cancelled = true;
                    break 'batches;
                }

                match result {
                    Ok(fp) => {
                        clusterer.insert(ImageRecord::new(path.clone(), fp));
                        fingerprinted += 1;
                    }
                    Err(error) => {
                        warn!(path = %path.display(), error = %error, "skipping image");
                        on_event(ScanEvent::Skipped {
                            path,
                            error: &error,
                        });
                        failures.push(SkippedImage {
                            path: path.clone(),
                            error,
                        });
                    }
                }
                on_event(tracker.advance());
            }
        }

        let report = ScanReport {
            images_total: paths.len(),
            images_processed: tracker.processed(),
            images_fingerprinted: fingerprinted,
            threshold: self.threshold,
            clusters: clusterer.into_clusters(),
            failures,
            duration_secs: start.elapsed().as_secs_f64(),
            cancelled,
        };

        info!(
            clusters = report.clusters.len(),
            skipped = report.failures.len(),
            cancelled,
            "scan finished"
        );
        report
    }
}

/// Decode one image and compute its fingerprint, tagging errors with the path
pub fn fingerprint_path(decoder: &dyn ImageDecoder, path: &Path) -> ScanResult<Fingerprint> {
    let buffer = decoder.decode(path).map_err(|e| e.with_path(path))?;
    let fp = fingerprint::extract(&buffer).map_err(|e| e.with_path(path))?;
    debug!(path = %path.display(), "fingerprinted");
    Ok(fp)
}

/// Enumerate `config.root` and run the full duplicate detection pipeline
pub fn find_duplicates<F>(config: &ScanConfig, cancel: &CancelToken, on_event: F) -> ScanResult<ScanReport>
where
    F: FnMut(ScanEvent<'_>),
{
    let paths = scanner::collect_images(&config.root, &config.extensions, config.recursive)?;

    let scanner = Scanner::new(config.threshold)
        .parallel(config.parallel)
        .with_cancel(cancel.clone());

    Ok(scanner.run(&paths, on_event))
}
