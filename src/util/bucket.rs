//! Power-of-two size buckets for corpus preparation.
//!
//! Files smaller than 64 KiB land in bucket `64`; larger files land in
//! `{lo}-{hi}` where `lo ≤ size/KiB < hi` and both bounds are powers of two.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use super::file_list::list_top_level_files;
use crate::displaylevel;

const SMALLEST_BUCKET_KB: u64 = 64;

/// Name of the bucket a file of `size` bytes belongs to.
pub fn size_bucket(size: u64) -> String {
    if size < SMALLEST_BUCKET_KB * 1024 {
        return SMALLEST_BUCKET_KB.to_string();
    }
    let mut hi = SMALLEST_BUCKET_KB;
    while hi.saturating_mul(1024) <= size {
        hi *= 2;
    }
    format!("{}-{}", hi / 2, hi)
}

/// What [`segregate`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegregateSummary {
    /// Directory the bucket directories were created in.
    pub parent: PathBuf,
    /// Files copied per bucket name.
    pub buckets: BTreeMap<String, usize>,
}

impl SegregateSummary {
    pub fn files_copied(&self) -> usize {
        self.buckets.values().sum()
    }
}

/// Copies every regular file directly inside `dir` into a bucket directory
/// created next to `dir`. Modification times are carried over.
pub fn segregate(dir: &Path) -> io::Result<SegregateSummary> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("directory {} does not exist", dir.display()),
        ));
    }
    let parent = match dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let files = list_top_level_files(dir)?;
    displaylevel!(2, "Total files found: {}\n", files.len());

    let mut summary = SegregateSummary {
        parent: parent.clone(),
        ..SegregateSummary::default()
    };
    for src in &files {
        let meta = fs::metadata(src)?;
        let bucket = size_bucket(meta.len());
        let bucket_dir = parent.join(&bucket);
        fs::create_dir_all(&bucket_dir)?;

        let Some(name) = src.file_name() else { continue };
        let dst = bucket_dir.join(name);
        fs::copy(src, &dst)?;
        filetime::set_file_mtime(&dst, FileTime::from_last_modification_time(&meta))?;
        displaylevel!(3, "{} -> {}\n", src.display(), dst.display());

        *summary.buckets.entry(bucket).or_insert(0) += 1;
    }
    displaylevel!(2, "Total files copied: {}\n", summary.files_copied());
    Ok(summary)
}
