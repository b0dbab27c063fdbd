//! Compression side of the driver.

use std::io::{Read, Write};

use super::{
    flush_output, read_chunk, write_produced, ByteChunk, StreamOptions, StreamStats, MAX_IDLE_STEPS,
};
use crate::codec::{
    Codec, CodecError, EncodeOperation, EncoderParameter, EncoderParams, EncoderSession,
    PreparedDictionary, StreamCursors,
};
use crate::displaylevel;
use crate::error::Result;
use crate::timefn::{Phase, StepProbe};

/// Compresses all of `input` into `output`.
///
/// One encoder session is created, configured with `params` and the optional
/// `dictionary`, and driven chunk by chunk. The chunk that comes back short
/// from the reader (possibly empty) is submitted with
/// [`EncodeOperation::Finish`]; every other chunk with `Process`. After each
/// step the produced bytes are written out immediately and the step is
/// repeated until the chunk is consumed and the session has nothing left to
/// hand out.
///
/// On error the session is dropped before the error is returned. Output
/// already written stays written; the destination should be treated as
/// invalid.
pub fn encode_stream<C, R, W, P>(
    codec: &C,
    mut input: R,
    mut output: W,
    params: &EncoderParams,
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
    params.validate()?;

    let mut session = codec.create_encoder()?;
    session.set_parameter(EncoderParameter::Quality, params.quality)?;
    session.set_parameter(EncoderParameter::WindowBits, params.window_bits)?;
    if let Some(dict) = dictionary {
        session.attach_dictionary(dict)?;
    }

    let mut in_chunk = ByteChunk::with_capacity(options.chunk_size);
    let mut out_chunk = ByteChunk::with_capacity(options.chunk_size);
    let out_cap = out_chunk.capacity();
    let mut stats = StreamStats::default();

    loop {
        let exhausted = read_chunk(&mut input, &mut in_chunk, &mut stats, &mut probe)?;
        let op = if exhausted {
            EncodeOperation::Finish
        } else {
            EncodeOperation::Process
        };
        let mut cursors = StreamCursors::new(in_chunk.len(), out_cap);
        let mut idle_steps = 0u32;

        loop {
            let available_in_before = cursors.available_in;

            probe.enter(Phase::Codec);
            let step = session.compress_step(
                op,
                in_chunk.as_slice(),
                out_chunk.buffer_mut(),
                &mut cursors,
            );
            probe.exit(Phase::Codec);
            stats.codec_calls += 1;
            step?;

            let produced = out_cap - cursors.available_out;
            write_produced(
                &mut output,
                &out_chunk.buffer()[..produced],
                &mut stats,
                &mut probe,
            )?;
            cursors.reset_output(out_cap);

            let pending = cursors.available_in > 0
                || session.has_more_output()
                || (op == EncodeOperation::Finish && !session.is_finished());
            if !pending {
                break;
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

        if exhausted {
            break;
        }
    }

    flush_output(&mut output)?;
    displaylevel!(
        4,
        "encode: {} -> {} bytes in {} steps over {} chunks\n",
        stats.bytes_in,
        stats.bytes_out,
        stats.codec_calls,
        stats.chunks
    );
    Ok(stats)
}
