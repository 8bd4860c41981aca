use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::common::errors::{ScanError, ScanResult};

/// Check if a file has one of the given extensions (case-insensitive)
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// List image files under `root` in a reproducible (sorted) order.
///
/// Only the top level is listed unless `recursive` is set. Dot-files are
/// listed like any other file, but hidden sub-directories are not descended
/// into. Unreadable sub-entries are logged and ignored; an unreadable root is
/// an error.
pub fn collect_images(root: &Path, extensions: &[String], recursive: bool) -> ScanResult<Vec<PathBuf>> {
    let meta = std::fs::metadata(root).map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::Io {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let walker = if recursive {
        WalkDir::new(root).follow_links(false)
    } else {
        WalkDir::new(root).follow_links(false).max_depth(1)
    };

    let mut images = Vec::new();
    for entry in walker
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() > 0 && e.file_type().is_dir() && is_hidden(e.file_name())))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            images.push(entry.into_path());
        }
    }

    images.sort();
    debug!(root = %root.display(), count = images.len(), "collected images");
    Ok(images)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        let home = dirs::home_dir().unwrap_or_default();
        home.join(rest.trim_start_matches('/'))
    } else {
        PathBuf::from(path)
    }
}
