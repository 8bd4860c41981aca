use std::path::Path;

use crate::common::errors::ScanError;

/// Incremental notifications emitted while a scan runs
#[derive(Debug)]
pub enum ScanEvent<'a> {
    /// An image was skipped; emitted right before its progress event
    Skipped { path: &'a Path, error: &'a ScanError },
    /// One more image has been processed (fingerprinted or skipped)
    Progress {
        processed: usize,
        total: usize,
        percent: u8,
    },
}

/// Counts processed images and turns the count into a percentage
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    processed: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self { total, processed: 0 }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    /// `floor(processed * 100 / total)`; 100 once every image is done
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.processed.min(self.total) * 100 / self.total) as u8
    }

    /// Record one processed image and return the event to emit
    pub fn advance(&mut self) -> ScanEvent<'static> {
        self.processed += 1;
        ScanEvent::Progress {
            processed: self.processed,
            total: self.total,
            percent: self.percent(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.processed >= self.total
    }
}
