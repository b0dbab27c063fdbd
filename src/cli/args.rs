//! Command-line arguments of `brbench`.
//!
//! Parsed with `clap` derive. Encoder values are passed through unchecked so
//! that out-of-range settings surface as codec errors from the library.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use super::constants::{PROGRAM_NAME, PROGRAM_VERSION};
use super::op_mode::Mode;
use crate::codec::EncoderParams;
use crate::config::{CHUNK_SIZE_DEFAULT, MONITOR_PERIOD_MS_DEFAULT, QUALITY_DEFAULT, WINDOW_BITS_DEFAULT};

/// Streaming Brotli driver with time, CPU and memory instrumentation.
#[derive(Debug, Parser)]
#[command(name = PROGRAM_NAME, version = PROGRAM_VERSION, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compress and/or decompress one file and print its metrics
    Run(RunArgs),
    /// Compress every file below a directory and write a CSV report
    Batch(BatchArgs),
    /// Compare two CSV reports and write a comparison report
    Compare(CompareArgs),
    /// Sample the resident set size of a running process
    Monitor(MonitorArgs),
    /// Copy files into power-of-two size-bucket directories
    Segregate(SegregateArgs),
}

/// Encoder settings shared by `run` and `batch`.
#[derive(Debug, Clone, Args)]
pub struct EncoderArgs {
    /// Compression quality (0-11)
    #[arg(short = 'c', long = "quality", default_value_t = QUALITY_DEFAULT)]
    pub quality: u32,

    /// Window size in bits (10-24)
    #[arg(short = 'w', long = "window-bits", default_value_t = WINDOW_BITS_DEFAULT)]
    pub window_bits: u32,

    /// Shared dictionary file
    #[arg(short = 'D', long = "dict", value_name = "FILE")]
    pub dictionary: Option<PathBuf>,

    /// Streaming chunk size in bytes
    #[arg(long, default_value_t = CHUNK_SIZE_DEFAULT)]
    pub chunk_size: usize,
}

impl EncoderArgs {
    pub fn params(&self) -> EncoderParams {
        EncoderParams::new(self.quality, self.window_bits)
    }
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Input file
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: PathBuf,

    /// What to do; inferred from the extension when omitted
    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Option<Mode>,

    /// Check that the uncompressed content matches the input
    #[arg(long)]
    pub verify: bool,

    #[command(flatten)]
    pub encoder: EncoderArgs,
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// Input directory
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: PathBuf,

    /// Passes over every file
    #[arg(short = 'i', long = "iterations", default_value_t = 1)]
    pub iterations: u32,

    /// Worker threads (0 = one per CPU)
    #[arg(short = 'j', long = "jobs", default_value_t = 1)]
    pub jobs: usize,

    /// Output directory [default: <DIR>_compressed_c<Q>_w<W>]
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub encoder: EncoderArgs,
}

#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    /// Report of the old settings
    pub baseline: PathBuf,

    /// Report of the new settings
    pub candidate: PathBuf,

    /// Version tag appended to the output file name
    #[arg(long)]
    pub tag: Option<String>,

    /// Directory to write the comparison into [default: .]
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct MonitorArgs {
    /// Process to sample
    #[arg(short = 'p', long)]
    pub pid: u32,

    /// Sampling period in milliseconds
    #[arg(long, default_value_t = MONITOR_PERIOD_MS_DEFAULT)]
    pub period_ms: u64,

    /// Stop after this many seconds instead of waiting for the process to exit
    #[arg(long)]
    pub duration_secs: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct SegregateArgs {
    /// Directory whose files are bucketed
    pub dir: PathBuf,
}
