//! File size helpers.

use std::fs;
use std::path::Path;

/// Size in bytes of the regular file at `path`.
///
/// Returns `0` if the path does not exist, is not a regular file, or cannot
/// be stat-ted.
pub fn get_file_size(path: &Path) -> u64 {
    fs::metadata(path)
        .ok()
        .filter(|m| m.file_type().is_file())
        .map(|m| m.len())
        .unwrap_or(0)
}

/// Sum of [`get_file_size`] over `paths`.
pub fn get_total_file_size<P: AsRef<Path>>(paths: &[P]) -> u64 {
    paths.iter().map(|p| get_file_size(p.as_ref())).sum()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
