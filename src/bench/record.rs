//! The outcome of one measured run.

use std::fmt;

use crate::timefn::{Phase, PhaseTimes};

/// Which way the data went through the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Compress,
    Decompress,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Compress => "compress",
            Direction::Decompress => "decompress",
        })
    }
}

/// Metrics of one completed encode or decode.
///
/// `original_size` is always the uncompressed byte count and
/// `compressed_size` the compressed one, whatever the direction. Decompress
/// records carry `quality` and `window_bits` of 0 since the decoder does not
/// know them.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRecord {
    pub identity: String,
    pub direction: Direction,
    pub original_size: u64,
    pub compressed_size: u64,
    pub quality: u32,
    pub window_bits: u32,
    pub phases: PhaseTimes,
    /// Process CPU time over wall time of the run, in percent.
    pub cpu_usage_percent: f64,
    /// Machine-wide CPU busy ticks over all ticks during the run, in percent.
    pub system_cpu_percent: f64,
    pub peak_rss_kb: u64,
}

impl MetricsRecord {
    /// `original_size / compressed_size`; `0.0` for an empty compressed side.
    pub fn compression_ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            0.0
        } else {
            self.original_size as f64 / self.compressed_size as f64
        }
    }

    /// Wall time of the whole run in seconds.
    pub fn total_secs(&self) -> f64 {
        self.phases.total_secs()
    }

    /// Time spent inside codec steps in seconds.
    pub fn codec_secs(&self) -> f64 {
        self.phases.secs(Phase::Codec)
    }
}
