//! Measured runs over files and directories.
//!
//! - [`instrument::Instrumenter`] wraps one driver call in usage snapshots
//!   and a wall clock, producing a [`MetricsRecord`].
//! - [`run::run_file`] compresses and/or decompresses a single file next to
//!   itself, optionally verifying the round trip.
//! - [`batch::run_batch`] runs every file below a directory for a number of
//!   iterations and writes the per-run CSV report.
//!
//! [`config::BatchConfig`] holds the batch knobs.

pub mod batch;
pub mod config;
pub mod instrument;
pub mod record;
pub mod run;

pub use batch::{run_batch, BatchOutcome};
pub use config::BatchConfig;
pub use instrument::Instrumenter;
pub use record::{Direction, MetricsRecord};
pub use run::{compress_file, decompress_file, run_file, RunOutcome};

use std::fs;
use std::path::Path;

use crate::codec::{CodecError, PreparedDictionary};
use crate::config::MAX_DICTIONARY_SIZE;
use crate::displaylevel;
use crate::error::{Error, Result};

// ── Dictionary loading ────────────────────────────────────────────────────────

/// Loads a shared dictionary from `path`.
///
/// The size is checked against the format limit before the file is read, so
/// an oversized dictionary is rejected without loading it.
pub fn load_dictionary(path: &Path) -> Result<PreparedDictionary> {
    let meta = fs::metadata(path).map_err(|e| {
        Error::io(format!("Dictionary error : could not stat {}", path.display()), e)
    })?;
    let size = meta.len();
    if size > MAX_DICTIONARY_SIZE as u64 {
        return Err(CodecError::DictionaryTooLarge {
            size: usize::try_from(size).unwrap_or(usize::MAX),
            max: MAX_DICTIONARY_SIZE,
        }
        .into());
    }
    let raw = fs::read(path).map_err(|e| {
        Error::io(format!("Dictionary error : could not read {}", path.display()), e)
    })?;
    let dict = PreparedDictionary::prepare(raw)?;
    displaylevel!(3, "Loaded dictionary {} ({} bytes)\n", path.display(), dict.len());
    Ok(dict)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
