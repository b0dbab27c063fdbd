//! Output paths derived from an input path.
//!
//! Compressed output goes next to the input as `<base>.br`; decompressed
//! output goes next to the `.br` file as `d-<base>`.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{BROTLI_EXTENSION, DECOMPRESSED_PREFIX};
use crate::error::{Error, Result};

/// `<dir>/<base>` → `<dir>/<base>.br`
pub fn compressed_path(src: &Path) -> PathBuf {
    let mut name: OsString = src.as_os_str().to_owned();
    name.push(BROTLI_EXTENSION);
    PathBuf::from(name)
}

/// `<dir>/<base>.br` → `<dir>/d-<base>`. Fails when `src` has no `.br` suffix.
pub fn decompressed_path(src: &Path) -> Result<PathBuf> {
    let file_name = src.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let base = file_name
        .strip_suffix(BROTLI_EXTENSION)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| {
            Error::io(
                format!("deriving output name for {}", src.display()),
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("input must end with {}", BROTLI_EXTENSION),
                ),
            )
        })?;
    Ok(src.with_file_name(format!("{}{}", DECOMPRESSED_PREFIX, base)))
}

/// Identity of a file in reports: its file name.
pub fn identity_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
