use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Top-level regular files of a directory, in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub files: Vec<PathBuf>,
    /// Entries left in place: ignore-list matches, symlinks and other special files
    pub ignored: Vec<PathBuf>,
}

/// List the regular files directly inside `dir`, sorted by file name.
/// Subdirectories are skipped. Symlinks are not followed and land in `ignored`.
pub fn scan_directory(dir: &Path, ignore: &[String]) -> Listing {
    let mut listing = Listing::default();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "error accessing entry");
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            debug!(path = %entry.path().display(), "not a regular file, left in place");
            listing.ignored.push(entry.path().to_path_buf());
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if ignore.iter().any(|ignored| ignored.as_str() == name) {
            debug!(path = %entry.path().display(), "ignored");
            listing.ignored.push(entry.path().to_path_buf());
            continue;
        }

        listing.files.push(entry.path().to_path_buf());
    }

    listing
}

/// Names of the immediate subdirectories of `dir`; empty if it does not exist
pub fn subdirectory_names(dir: &Path) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}
