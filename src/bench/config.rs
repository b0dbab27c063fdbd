//! Batch configuration: runtime parameters for [`super::batch::run_batch`].
//!
//! [`BatchConfig`] holds every tuneable setting of a batch run (encoder
//! parameters, iteration count, worker count, output location, chunk size).
//! Its builder-style setters allow callers to construct a configuration
//! incrementally before passing it to the batch runner.

use std::path::{Path, PathBuf};

use crate::codec::EncoderParams;
use crate::config::CHUNK_SIZE_DEFAULT;

/// Default number of passes over the input directory.
pub const ITERATIONS_DEFAULT: u32 = 1;

// ── BatchConfig struct ────────────────────────────────────────────────────────

/// Runtime parameters controlling one batch run.
///
/// Construct via [`Default`] and then adjust with the builder-style setters,
/// or set fields directly. All fields are `pub` for convenient inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Encoder quality and window bits applied to every file.
    pub params: EncoderParams,

    /// Number of times each file is compressed (default: [`ITERATIONS_DEFAULT`]).
    /// Every pass contributes one report row per file.
    pub iterations: u32,

    /// Worker threads. `0` = one per logical CPU, `1` = sequential (default).
    pub jobs: usize,

    /// Where compressed files and the report go. `None` derives
    /// `<input>_compressed_c{q}_w{w}` next to the input directory.
    pub output_dir: Option<PathBuf>,

    /// Driver chunk capacity in bytes.
    pub chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            params: EncoderParams::default(),
            iterations: ITERATIONS_DEFAULT,
            jobs: 1,
            output_dir: None,
            chunk_size: CHUNK_SIZE_DEFAULT,
        }
    }
}

impl BatchConfig {
    // ── Setters ───────────────────────────────────────────────────────────────

    pub fn set_quality(&mut self, quality: u32) -> &mut Self {
        self.params.quality = quality;
        self
    }

    pub fn set_window_bits(&mut self, window_bits: u32) -> &mut Self {
        self.params.window_bits = window_bits;
        self
    }

    /// Set the number of passes. `0` is raised to 1.
    pub fn set_iterations(&mut self, iterations: u32) -> &mut Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn set_jobs(&mut self, jobs: usize) -> &mut Self {
        self.jobs = jobs;
        self
    }

    pub fn set_output_dir(&mut self, dir: Option<PathBuf>) -> &mut Self {
        self.output_dir = dir;
        self
    }

    /// Set the chunk capacity. `0` is raised to 1.
    pub fn set_chunk_size(&mut self, chunk_size: usize) -> &mut Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    // ── Derived values ────────────────────────────────────────────────────────

    /// Worker count with `0` resolved to the number of logical CPUs.
    pub fn effective_jobs(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get().max(1)
        } else {
            self.jobs
        }
    }

    /// Output directory for a batch over `input_dir`.
    pub fn output_dir_for(&self, input_dir: &Path) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        let trimmed = input_dir
            .components()
            .as_path()
            .to_string_lossy()
            .trim_end_matches(['/', '\\'])
            .to_owned();
        PathBuf::from(format!(
            "{}_compressed_c{}_w{}",
            trimmed, self.params.quality, self.params.window_bits
        ))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
