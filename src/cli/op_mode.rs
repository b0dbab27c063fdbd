//! Operation mode of a single-file run.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use crate::config::BROTLI_EXTENSION;

/// What `run` does with its input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Compress `<file>` into `<file>.br`.
    Compress,
    /// Decompress `<base>.br` into `d-<base>`.
    Decompress,
    /// Compress, then decompress the result.
    Both,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Compress => "compress",
            Mode::Decompress => "decompress",
            Mode::Both => "both",
        })
    }
}

impl Mode {
    pub fn compresses(self) -> bool {
        matches!(self, Mode::Compress | Mode::Both)
    }

    pub fn decompresses(self) -> bool {
        matches!(self, Mode::Decompress | Mode::Both)
    }
}

/// Infers the mode from `path`'s extension when none was given:
/// [`Mode::Decompress`] for `.br` files, [`Mode::Compress`] otherwise.
pub fn determine_mode(path: &Path) -> Mode {
    let is_brotli = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() > BROTLI_EXTENSION.len() && n.ends_with(BROTLI_EXTENSION));
    if is_brotli {
        Mode::Decompress
    } else {
        Mode::Compress
    }
}
