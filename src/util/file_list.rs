//! File list construction with recursive directory expansion.
//!
//! Given a mixed list of file and directory paths, [`create_file_list`] returns
//! a flat, sorted `Vec<PathBuf>` containing only regular files. Directories are
//! walked recursively using the [`walkdir`] crate.
//!
//! Symlinks are never followed during directory traversal, so symlink entries
//! are excluded and cyclic links cannot loop. A symlink passed directly as a
//! non-directory input is forwarded as-is.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

fn walk_error(e: walkdir::Error) -> io::Error {
    match e.io_error() {
        Some(io) => io::Error::new(io.kind(), e.to_string()),
        None => io::Error::other(e.to_string()),
    }
}

/// Expand a mixed list of file and directory paths into a flat list of regular files.
///
/// Non-directory inputs are forwarded unchanged. Directory entries are
/// sorted by file name so the result is stable across runs. An unreadable
/// entry aborts the walk.
pub fn create_file_list<P: AsRef<Path>>(inputs: &[P]) -> io::Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(walk_error)?;
                if entry.file_type().is_file() {
                    result.push(entry.into_path());
                }
            }
        } else {
            result.push(input.to_path_buf());
        }
    }
    Ok(result)
}

/// Regular files directly inside `dir`, sorted, without descending.
pub fn list_top_level_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(walk_error)?;
        if entry.file_type().is_file() {
            result.push(entry.into_path());
        }
    }
    Ok(result)
}

/// `path` relative to `root` with `/` separators, or the file name when
/// `path` is not below `root`.
pub fn relative_identity(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        _ => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
