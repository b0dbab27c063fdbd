//! Single-file runs: compress, decompress, or both, with derived output paths.

use std::fs::File;
use std::path::{Path, PathBuf};

use super::instrument::Instrumenter;
use super::record::MetricsRecord;
use crate::cli::op_mode::Mode;
use crate::cli::paths::{compressed_path, decompressed_path, identity_of};
use crate::codec::{Codec, EncoderParams, PreparedDictionary};
use crate::displaylevel;
use crate::error::{Error, Result};
use crate::stream::decode_stream;
use crate::usage::UsageOracle;
use crate::util::{hash_file, HashingWriter};

/// Results of one [`run_file`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub mode: Mode,
    pub compress: Option<MetricsRecord>,
    pub compressed_path: Option<PathBuf>,
    pub decompress: Option<MetricsRecord>,
    pub decompressed_path: Option<PathBuf>,
    /// `Some(matches)` when verification was requested and possible.
    pub verified: Option<bool>,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| Error::io(format!("opening {}", path.display()), e))
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| Error::io(format!("creating {}", path.display()), e))
}

/// Compresses `src` into `dst`.
pub fn compress_file<O: UsageOracle, C: Codec>(
    inst: &Instrumenter<O, C>,
    src: &Path,
    dst: &Path,
    params: &EncoderParams,
    dictionary: Option<&PreparedDictionary>,
) -> Result<MetricsRecord> {
    let input = open(src)?;
    let output = create(dst)?;
    inst.compress(&identity_of(src), input, output, params, dictionary)
}

/// Decompresses `src` into `dst`.
pub fn decompress_file<O: UsageOracle, C: Codec>(
    inst: &Instrumenter<O, C>,
    src: &Path,
    dst: &Path,
    dictionary: Option<&PreparedDictionary>,
) -> Result<MetricsRecord> {
    let input = open(src)?;
    let output = create(dst)?;
    inst.decompress(&identity_of(src), input, output, dictionary)
}

/// Runs `mode` on `src`, writing next to it.
///
/// Compress writes `<base>.br`; decompress requires a `.br` input and writes
/// `d-<base>`; both does the first and then the second on its result. With
/// `verify`, the uncompressed content is checked against `src` by XXH64
/// digest; a decompress-only run has nothing to compare against and is left
/// unverified.
pub fn run_file<O: UsageOracle, C: Codec>(
    inst: &Instrumenter<O, C>,
    src: &Path,
    mode: Mode,
    params: &EncoderParams,
    dictionary: Option<&PreparedDictionary>,
    verify: bool,
) -> Result<RunOutcome> {
    params.validate()?;
    let mut outcome = RunOutcome {
        mode,
        compress: None,
        compressed_path: None,
        decompress: None,
        decompressed_path: None,
        verified: None,
    };

    let to_decompress = if mode.compresses() {
        let dst = compressed_path(src);
        displaylevel!(3, "compressing {} -> {}\n", src.display(), dst.display());
        outcome.compress = Some(compress_file(inst, src, &dst, params, dictionary)?);
        outcome.compressed_path = Some(dst.clone());
        dst
    } else {
        src.to_path_buf()
    };

    if mode.decompresses() {
        let dst = decompressed_path(&to_decompress)?;
        displaylevel!(3, "decompressing {} -> {}\n", to_decompress.display(), dst.display());
        outcome.decompress = Some(decompress_file(inst, &to_decompress, &dst, dictionary)?);
        outcome.decompressed_path = Some(dst);
    }

    if verify {
        outcome.verified = verify_outcome(inst, src, &outcome, dictionary)?;
    }
    Ok(outcome)
}

fn verify_outcome<O: UsageOracle, C: Codec>(
    inst: &Instrumenter<O, C>,
    src: &Path,
    outcome: &RunOutcome,
    dictionary: Option<&PreparedDictionary>,
) -> Result<Option<bool>> {
    let digest = |p: &Path| {
        hash_file(p).map_err(|e| Error::io(format!("hashing {}", p.display()), e))
    };

    let decoded = match (&outcome.decompressed_path, &outcome.compressed_path) {
        (Some(_), _) if outcome.mode == Mode::Decompress => {
            displaylevel!(2, "verify: decompress-only run has no original to compare against\n");
            return Ok(None);
        }
        (Some(decompressed), _) => digest(decompressed)?,
        (None, Some(compressed)) => {
            let mut sink = HashingWriter::new();
            decode_stream(
                inst.codec(),
                open(compressed)?,
                &mut sink,
                dictionary,
                inst.stream_options(),
                (),
            )?;
            sink.digest()
        }
        (None, None) => return Ok(None),
    };

    let matches = decoded == digest(src)?;
    if !matches {
        displaylevel!(1, "verify: {} does not round-trip\n", src.display());
    }
    Ok(Some(matches))
}
