use std::path::{Path, PathBuf};

use tracing::debug;

use super::fingerprint::Fingerprint;
use crate::common::errors::{ScanError, ScanResult};

/// Default similarity percentage (threshold 10)
pub const DEFAULT_SIMILARITY: f64 = 90.0;

/// Maximum distance for two fingerprints to count as duplicates.
///
/// Derived from a similarity percentage `p` as `100 - p` and held constant
/// for one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityThreshold(f64);

impl SimilarityThreshold {
    pub fn from_percent(percent: f64) -> ScanResult<Self> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(ScanError::InvalidSimilarity(percent));
        }
        Ok(Self(100.0 - percent))
    }

    /// Use a raw distance bound directly
    pub fn from_distance(max_distance: f64) -> Self {
        Self(max_distance.max(0.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn similarity_percent(&self) -> f64 {
        100.0 - self.0
    }

    pub fn matches(&self, distance: f64) -> bool {
        distance <= self.0
    }
}

impl Default for SimilarityThreshold {
    fn default() -> Self {
        Self(100.0 - DEFAULT_SIMILARITY)
    }
}

/// An image path paired with its fingerprint
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
}

impl ImageRecord {
    pub fn new(path: impl Into<PathBuf>, fingerprint: Fingerprint) -> Self {
        Self {
            path: path.into(),
            fingerprint,
        }
    }
}

/// Position of a cluster in creation order
pub type ClusterId = usize;

/// A representative image plus every later image that matched it.
///
/// The representative is the first image assigned to the cluster and never
/// changes; it is not repeated in `members`.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCluster {
    representative: ImageRecord,
    members: Vec<PathBuf>,
}

impl DuplicateCluster {
    fn new(representative: ImageRecord) -> Self {
        Self {
            representative,
            members: Vec::new(),
        }
    }

    pub fn representative(&self) -> &ImageRecord {
        &self.representative
    }

    pub fn representative_path(&self) -> &Path {
        &self.representative.path
    }

    pub fn members(&self) -> &[PathBuf] {
        &self.members
    }

    pub fn member(&self, index: usize) -> Option<&Path> {
        self.members.get(index).map(PathBuf::as_path)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn has_duplicates(&self) -> bool {
        !self.members.is_empty()
    }

    /// Index after `current`, wrapping to the first member
    pub fn next_member_index(&self, current: usize) -> Option<usize> {
        match self.members.len() {
            0 => None,
            n if current + 1 >= n => Some(0),
            _ => Some(current + 1),
        }
    }

    /// Index before `current`, wrapping to the last member
    pub fn previous_member_index(&self, current: usize) -> Option<usize> {
        match self.members.len() {
            0 => None,
            n if current == 0 || current > n => Some(n - 1),
            _ => Some(current - 1),
        }
    }
}

/// Outcome of feeding one image into the clusterer.
///
/// An image that matches several representatives joins all of them, so
/// clusters may overlap and are not equivalence classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// Matched nothing and now anchors a new cluster
    Representative(ClusterId),
    /// Appended as a member of every listed cluster, in creation order
    MemberOf(Vec<ClusterId>),
}

/// Greedy single-pass grouping of fingerprints.
///
/// Each incoming image is compared against the representative of every
/// existing cluster only. Results depend on input order, and two members of
/// one cluster may be further apart than the threshold.
#[derive(Debug, Clone, Default)]
pub struct DuplicateClusterer {
    threshold: SimilarityThreshold,
    clusters: Vec<DuplicateCluster>,
}

impl DuplicateClusterer {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self {
            threshold,
            clusters: Vec::new(),
        }
    }

    pub fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    pub fn insert(&mut self, record: ImageRecord) -> Assignment {
        let matched: Vec<ClusterId> = self
            .clusters
            .iter()
            .enumerate()
            .filter(|(_, cluster)| {
                let d = cluster.representative.fingerprint.distance(&record.fingerprint);
                self.threshold.matches(d)
            })
            .map(|(id, _)| id)
            .collect();

        if matched.is_empty() {
            let id = self.clusters.len();
            debug!(path = %record.path.display(), cluster = id, "new representative");
            self.clusters.push(DuplicateCluster::new(record));
            return Assignment::Representative(id);
        }

        for &id in &matched {
            self.clusters[id].members.push(record.path.clone());
        }
        debug!(path = %record.path.display(), clusters = ?matched, "duplicate");
        Assignment::MemberOf(matched)
    }

    pub fn clusters(&self) -> &[DuplicateCluster] {
        &self.clusters
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&DuplicateCluster> {
        self.clusters.get(id)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn into_clusters(self) -> Vec<DuplicateCluster> {
        self.clusters
    }
}

/// Clusters that gained at least one member, in creation order
pub fn duplicates_only(clusters: &[DuplicateCluster]) -> Vec<(ClusterId, &DuplicateCluster)> {
    clusters
        .iter()
        .enumerate()
        .filter(|(_, c)| c.has_duplicates())
        .collect()
}
