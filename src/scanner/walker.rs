//! Recursive enumeration of the files under a scan root.

use crate::core::config::ScanConfig;
use crate::core::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check if a path contains any of the excluded fragments.
pub fn is_excluded(path: &Path, exclude_paths: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_paths
        .iter()
        .any(|excluded| !excluded.is_empty() && path_str.contains(excluded.as_str()))
}

/// Lazily enumerate every regular file beneath `root`.
///
/// The root itself must be a readable directory; that is checked up front
/// and reported as a fatal error. Entries that become unreadable during the
/// walk are logged and skipped.
pub fn enumerate_files(
    root: &Path,
    config: &ScanConfig,
) -> Result<impl Iterator<Item = PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::PathNotFound(root.to_path_buf())
        } else {
            Error::DirectoryAccess {
                path: root.to_path_buf(),
                source: e,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    std::fs::read_dir(root).map_err(|e| Error::DirectoryAccess {
        path: root.to_path_buf(),
        source: e,
    })?;

    let exclude_paths = config.exclude_paths.clone();
    let size_limit = config.max_file_size_bytes();

    let walker = WalkDir::new(root)
        .follow_links(config.follow_symlinks)
        .into_iter()
        .filter_entry(move |e| !is_excluded(e.path(), &exclude_paths));

    Ok(walker.filter_map(move |entry| {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                return None;
            }
        };

        if !entry.file_type().is_file() {
            return None;
        }

        if let Some(limit) = size_limit {
            match entry.metadata() {
                Ok(m) if m.len() > limit => {
                    log::debug!("Skipping large file: {}", entry.path().display());
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("Skipping {}: {}", entry.path().display(), e);
                    return None;
                }
            }
        }

        Some(entry.into_path())
    }))
}
