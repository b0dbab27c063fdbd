//! Decompression side of the driver.

use std::io::{Read, Write};

use super::{
    flush_output, read_chunk, write_produced, ByteChunk, StreamOptions, StreamStats, MAX_IDLE_STEPS,
};
use crate::codec::{Codec, CodecError, DecodeStatus, DecoderSession, PreparedDictionary, StreamCursors};
use crate::displaylevel;
use crate::error::{Error, Result};
use crate::timefn::{Phase, StepProbe};

/// Decompresses one stream from `input` into `output`.
///
/// The decoder reporting [`DecodeStatus::Done`] is the only way this returns
/// `Ok`. If `input` runs dry first, the stream was truncated and
/// [`Error::Truncated`] is returned even though every byte decoded so far has
/// been written. Bytes following the end of the stream are ignored.
pub fn decode_stream<C, R, W, P>(
    codec: &C,
    mut input: R,
    mut output: W,
    dictionary: Option<&PreparedDictionary>,
    options: &StreamOptions,
    mut probe: P,
) -> Result<StreamStats>
where
    C: Codec + ?Sized,
    R: Read,
    W: Write,
    P: StepProbe,
{
    let mut session = codec.create_decoder(dictionary)?;

    let mut in_chunk = ByteChunk::with_capacity(options.chunk_size);
    let mut out_chunk = ByteChunk::with_capacity(options.chunk_size);
    let out_cap = out_chunk.capacity();
    let mut stats = StreamStats::default();

    loop {
        read_chunk(&mut input, &mut in_chunk, &mut stats, &mut probe)?;
        if in_chunk.is_empty() {
            displaylevel!(
                3,
                "decode: input ended after {} bytes before end of stream\n",
                stats.bytes_in
            );
            return Err(Error::Truncated {
                bytes_in: stats.bytes_in,
            });
        }
        let mut cursors = StreamCursors::new(in_chunk.len(), out_cap);
        let mut idle_steps = 0u32;

        loop {
            let available_in_before = cursors.available_in;

            probe.enter(Phase::Codec);
            let status = session.decompress_step(
                in_chunk.as_slice(),
                out_chunk.buffer_mut(),
                &mut cursors,
            );
            probe.exit(Phase::Codec);
            stats.codec_calls += 1;

            let produced = out_cap - cursors.available_out;
            match status {
                DecodeStatus::Done => {
                    write_produced(
                        &mut output,
                        &out_chunk.buffer()[..produced],
                        &mut stats,
                        &mut probe,
                    )?;
                    if cursors.available_in > 0 {
                        displaylevel!(
                            3,
                            "decode: ignoring {} bytes after end of stream\n",
                            cursors.available_in
                        );
                    }
                    flush_output(&mut output)?;
                    displaylevel!(
                        4,
                        "decode: {} -> {} bytes in {} steps, {} total out\n",
                        stats.bytes_in,
                        stats.bytes_out,
                        stats.codec_calls,
                        session.total_out()
                    );
                    return Ok(stats);
                }
                DecodeStatus::NeedsInput => {
                    write_produced(
                        &mut output,
                        &out_chunk.buffer()[..produced],
                        &mut stats,
                        &mut probe,
                    )?;
                    cursors.reset_output(out_cap);
                    if cursors.available_in == 0 {
                        break;
                    }
                }
                DecodeStatus::NeedsOutput => {
                    write_produced(
                        &mut output,
                        &out_chunk.buffer()[..produced],
                        &mut stats,
                        &mut probe,
                    )?;
                    cursors.reset_output(out_cap);
                }
                DecodeStatus::Error => {
                    displaylevel!(
                        3,
                        "decode: corrupt stream near input byte {}\n",
                        stats.bytes_in - cursors.available_in as u64
                    );
                    return Err(CodecError::StreamFailed.into());
                }
            }

            if produced == 0 && cursors.available_in == available_in_before {
                idle_steps += 1;
                if idle_steps >= MAX_IDLE_STEPS {
                    return Err(CodecError::Stalled.into());
                }
            } else {
                idle_steps = 0;
            }
        }
    }
}
