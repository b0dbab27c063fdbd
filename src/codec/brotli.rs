//! Brotli sessions over the pure-Rust `brotli` crate.
//!
//! The encoder and decoder states are held by value; their buffers come from
//! `StandardAlloc` and are freed when the session is dropped.

use ::brotli::enc::encode::{
    BrotliEncoderOperation, BrotliEncoderParameter, BrotliEncoderStateStruct,
};
use ::brotli::enc::StandardAlloc;
use ::brotli::{BrotliDecompressStream, BrotliResult, BrotliState};

use super::{
    Codec, CodecError, DecodeStatus, DecoderSession, EncodeOperation, EncoderParameter,
    EncoderParams, EncoderSession, PreparedDictionary, StreamCursors,
};
use crate::displaylevel;

/// The Brotli codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Brotli;

impl Codec for Brotli {
    type Encoder = BrotliEncoder;
    type Decoder = BrotliDecoder;

    fn create_encoder(&self) -> Result<BrotliEncoder, CodecError> {
        displaylevel!(4, "brotli: encoder session created\n");
        Ok(BrotliEncoder {
            state: BrotliEncoderStateStruct::new(StandardAlloc::default()),
            started: false,
        })
    }

    fn create_decoder(
        &self,
        dictionary: Option<&PreparedDictionary>,
    ) -> Result<BrotliDecoder, CodecError> {
        let state = match dictionary {
            Some(dict) => BrotliState::new_with_custom_dictionary(
                StandardAlloc::default(),
                StandardAlloc::default(),
                StandardAlloc::default(),
                dict.as_bytes().to_vec().into(),
            ),
            None => BrotliState::new(
                StandardAlloc::default(),
                StandardAlloc::default(),
                StandardAlloc::default(),
            ),
        };
        displaylevel!(4, "brotli: decoder session created\n");
        Ok(BrotliDecoder { state, total_out: 0 })
    }
}

// ── Encoder ───────────────────────────────────────────────────────────────────

pub struct BrotliEncoder {
    state: BrotliEncoderStateStruct<StandardAlloc>,
    // Parameters and dictionaries are only honoured before the first step.
    started: bool,
}

impl EncoderSession for BrotliEncoder {
    fn set_parameter(&mut self, parameter: EncoderParameter, value: u32) -> Result<(), CodecError> {
        let rejected = CodecError::ParameterRejected { parameter, value };
        let (param, params) = match parameter {
            EncoderParameter::Quality => (
                BrotliEncoderParameter::BROTLI_PARAM_QUALITY,
                EncoderParams::new(value, crate::config::WINDOW_BITS_DEFAULT),
            ),
            EncoderParameter::WindowBits => (
                BrotliEncoderParameter::BROTLI_PARAM_LGWIN,
                EncoderParams::new(crate::config::QUALITY_DEFAULT, value),
            ),
        };
        // The library clamps out-of-range values silently; refuse them instead.
        if self.started || params.validate().is_err() {
            return Err(rejected);
        }
        if self.state.set_parameter(param, value) {
            Ok(())
        } else {
            Err(rejected)
        }
    }

    fn attach_dictionary(&mut self, dictionary: &PreparedDictionary) -> Result<(), CodecError> {
        if self.started {
            return Err(CodecError::DictionaryAttach);
        }
        self.state
            .set_custom_dictionary(dictionary.len(), dictionary.as_bytes());
        displaylevel!(4, "brotli: attached {} byte dictionary\n", dictionary.len());
        Ok(())
    }

    fn compress_step(
        &mut self,
        op: EncodeOperation,
        input: &[u8],
        output: &mut [u8],
        cursors: &mut StreamCursors,
    ) -> Result<(), CodecError> {
        self.started = true;
        let op = match op {
            EncodeOperation::Process => BrotliEncoderOperation::BROTLI_OPERATION_PROCESS,
            EncodeOperation::Finish => BrotliEncoderOperation::BROTLI_OPERATION_FINISH,
        };
        let mut total_out: Option<usize> = None;
        let ok = self.state.compress_stream(
            op,
            &mut cursors.available_in,
            input,
            &mut cursors.next_in,
            &mut cursors.available_out,
            output,
            &mut cursors.next_out,
            &mut total_out,
            &mut |_, _, _, _| (),
        );
        if ok {
            Ok(())
        } else {
            Err(CodecError::StreamFailed)
        }
    }

    fn has_more_output(&self) -> bool {
        self.state.has_more_output()
    }

    fn is_finished(&self) -> bool {
        self.state.is_finished()
    }
}

impl Drop for BrotliEncoder {
    fn drop(&mut self) {
        displaylevel!(4, "brotli: encoder session released\n");
    }
}

// ── Decoder ───────────────────────────────────────────────────────────────────

pub struct BrotliDecoder {
    state: BrotliState<StandardAlloc, StandardAlloc, StandardAlloc>,
    total_out: usize,
}

impl DecoderSession for BrotliDecoder {
    fn decompress_step(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        cursors: &mut StreamCursors,
    ) -> DecodeStatus {
        let result = BrotliDecompressStream(
            &mut cursors.available_in,
            &mut cursors.next_in,
            input,
            &mut cursors.available_out,
            &mut cursors.next_out,
            output,
            &mut self.total_out,
            &mut self.state,
        );
        match result {
            BrotliResult::ResultSuccess => DecodeStatus::Done,
            BrotliResult::NeedsMoreInput => DecodeStatus::NeedsInput,
            BrotliResult::NeedsMoreOutput => DecodeStatus::NeedsOutput,
            BrotliResult::ResultFailure => DecodeStatus::Error,
        }
    }

    fn total_out(&self) -> u64 {
        self.total_out as u64
    }
}

impl Drop for BrotliDecoder {
    fn drop(&mut self) {
        displaylevel!(4, "brotli: decoder session released ({} bytes out)\n", self.total_out);
    }
}
