//! Run instrumenter: wraps one driver call in usage snapshots and a wall clock.
//!
//! A measurement is `snapshot → start clock → driver (with a PhaseClock) →
//! stop clock → snapshot`. The only side effect is whatever the driver writes
//! to the output stream.
//!
//! When the `realtime-priority` Cargo feature is enabled, constructing an
//! instrumenter attempts to raise the process scheduling priority via
//! `setpriority(2)` to reduce OS-induced jitter in measurements.

use std::io::{Read, Write};

use super::record::{Direction, MetricsRecord};
use crate::codec::{Brotli, Codec, EncoderParams, PreparedDictionary};
use crate::error::{Error, Result};
use crate::stream::{decode_stream, encode_stream, StreamOptions, StreamStats};
use crate::timefn::{clock_span_ns, get_time, PhaseClock, PhaseTimes};
use crate::usage::{delta_cpu_percent, delta_system_cpu_percent, UsageOracle, UsageSnapshot};

/// Measures encode and decode runs of one codec against one usage oracle.
#[derive(Debug, Clone)]
pub struct Instrumenter<O: UsageOracle, C: Codec = Brotli> {
    oracle: O,
    codec: C,
    options: StreamOptions,
}

impl<O: UsageOracle> Instrumenter<O, Brotli> {
    pub fn new(oracle: O) -> Self {
        Instrumenter::with_codec(oracle, Brotli)
    }
}

impl<O: UsageOracle, C: Codec> Instrumenter<O, C> {
    pub fn with_codec(oracle: O, codec: C) -> Self {
        raise_priority();
        Instrumenter {
            oracle,
            codec,
            options: StreamOptions::default(),
        }
    }

    pub fn set_stream_options(&mut self, options: StreamOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn stream_options(&self) -> &StreamOptions {
        &self.options
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Compresses `input` into `output` and measures it.
    pub fn compress<R: Read, W: Write>(
        &self,
        identity: &str,
        input: R,
        output: W,
        params: &EncoderParams,
        dictionary: Option<&PreparedDictionary>,
    ) -> Result<MetricsRecord> {
        let before = self.snapshot()?;
        let start = get_time();
        let mut clock = PhaseClock::new();
        let stats = encode_stream(
            &self.codec,
            input,
            output,
            params,
            dictionary,
            &self.options,
            &mut clock,
        )?;
        let phases = clock.finish(clock_span_ns(start));
        let after = self.snapshot()?;

        Ok(build_record(
            identity,
            Direction::Compress,
            &stats,
            params,
            phases,
            &before,
            &after,
        ))
    }

    /// Decompresses `input` into `output` and measures it.
    pub fn decompress<R: Read, W: Write>(
        &self,
        identity: &str,
        input: R,
        output: W,
        dictionary: Option<&PreparedDictionary>,
    ) -> Result<MetricsRecord> {
        let before = self.snapshot()?;
        let start = get_time();
        let mut clock = PhaseClock::new();
        let stats = decode_stream(
            &self.codec,
            input,
            output,
            dictionary,
            &self.options,
            &mut clock,
        )?;
        let phases = clock.finish(clock_span_ns(start));
        let after = self.snapshot()?;

        Ok(build_record(
            identity,
            Direction::Decompress,
            &stats,
            &EncoderParams::new(0, 0),
            phases,
            &before,
            &after,
        ))
    }

    fn snapshot(&self) -> Result<UsageSnapshot> {
        self.oracle
            .snapshot()
            .map_err(|e| Error::io("reading usage counters", e))
    }
}

fn build_record(
    identity: &str,
    direction: Direction,
    stats: &StreamStats,
    params: &EncoderParams,
    phases: PhaseTimes,
    before: &UsageSnapshot,
    after: &UsageSnapshot,
) -> MetricsRecord {
    let (original_size, compressed_size) = match direction {
        Direction::Compress => (stats.bytes_in, stats.bytes_out),
        Direction::Decompress => (stats.bytes_out, stats.bytes_in),
    };
    MetricsRecord {
        identity: identity.to_owned(),
        direction,
        original_size,
        compressed_size,
        quality: params.quality,
        window_bits: params.window_bits,
        phases,
        cpu_usage_percent: delta_cpu_percent(before, after, phases.total_secs()),
        system_cpu_percent: delta_system_cpu_percent(before, after),
        peak_rss_kb: after.peak_rss_kb,
    }
}

#[cfg(feature = "realtime-priority")]
fn raise_priority() {
    // SAFETY: setpriority(2) adjusts only the calling process's scheduling
    // priority; it has no memory-safety implications.
    unsafe {
        libc::setpriority(libc::PRIO_PROCESS, 0, -20);
    }
}

#[cfg(not(feature = "realtime-priority"))]
fn raise_priority() {}
