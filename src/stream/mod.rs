//! Streaming codec driver.
//!
//! [`encode_stream`] and [`decode_stream`] push a whole input stream through
//! one codec session in fixed-size chunks, draining every byte of pending
//! output before advancing. Both are generic over the codec, the streams and
//! a [`StepProbe`] that brackets the read, codec and write sub-steps.
//!
//! The chunk capacity is a tuning knob only; any capacity ≥ 1 round-trips.

pub mod chunk;
pub mod decode;
pub mod encode;

pub use chunk::ByteChunk;
pub use decode::decode_stream;
pub use encode::encode_stream;

use std::io::{self, Read, Write};

use crate::config::CHUNK_SIZE_DEFAULT;
use crate::error::{Error, Result};
use crate::timefn::{Phase, StepProbe};

// ── Options ───────────────────────────────────────────────────────────────────

/// Runtime parameters of one driver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Capacity of both the input and the output chunk, in bytes (≥ 1).
    pub chunk_size: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        StreamOptions {
            chunk_size: CHUNK_SIZE_DEFAULT,
        }
    }
}

impl StreamOptions {
    /// Sets the chunk capacity. A value of 0 is raised to 1.
    pub fn set_chunk_size(&mut self, chunk_size: usize) -> &mut Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Counters collected while streaming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Bytes read from the input stream.
    pub bytes_in: u64,
    /// Bytes written to the output stream.
    pub bytes_out: u64,
    /// Number of compress/decompress steps issued.
    pub codec_calls: u64,
    /// Number of input chunks read, including the final short or empty one.
    pub chunks: u64,
}

/// Consecutive steps without input consumed or output produced before the
/// session is declared stuck.
pub(crate) const MAX_IDLE_STEPS: u32 = 16;

// ── Shared I/O helpers ────────────────────────────────────────────────────────

/// Refills `chunk` from `input` and accounts the read in `stats`.
///
/// Returns `true` when the input is exhausted (the chunk could not be filled).
pub(crate) fn read_chunk<R: Read, P: StepProbe>(
    input: &mut R,
    chunk: &mut ByteChunk,
    stats: &mut StreamStats,
    probe: &mut P,
) -> Result<bool> {
    probe.enter(Phase::Read);
    let filled = chunk.fill_from(input);
    probe.exit(Phase::Read);
    let n = filled.map_err(|e| Error::io("reading input", e))?;
    stats.bytes_in += n as u64;
    stats.chunks += 1;
    Ok(n < chunk.capacity())
}

/// Writes `produced` to `output` and accounts it in `stats`. Empty slices are skipped.
pub(crate) fn write_produced<W: Write, P: StepProbe>(
    output: &mut W,
    produced: &[u8],
    stats: &mut StreamStats,
    probe: &mut P,
) -> Result<()> {
    if produced.is_empty() {
        return Ok(());
    }
    probe.enter(Phase::Write);
    let written = output.write_all(produced);
    probe.exit(Phase::Write);
    written.map_err(|e| Error::io("writing output", e))?;
    stats.bytes_out += produced.len() as u64;
    Ok(())
}

/// Flushes the destination once the stream is complete.
pub(crate) fn flush_output<W: Write>(output: &mut W) -> Result<()> {
    output
        .flush()
        .map_err(|e: io::Error| Error::io("flushing output", e))
}
