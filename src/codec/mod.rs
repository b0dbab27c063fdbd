//! Incremental codec contract consumed by the streaming driver.
//!
//! A [`Codec`] hands out one session per file operation. Sessions are plain
//! owned values: dropping one releases everything the library allocated for
//! it, so every early return in the driver releases the session exactly once.
//!
//! The cursor model follows the library's streaming API: the driver owns the
//! input and output chunks and a [`StreamCursors`] describing the unconsumed
//! part of the input and the unfilled part of the output. A step advances the
//! cursors in place.
//!
//! [`brotli::Brotli`] is the production implementation.

pub mod brotli;

use crate::config::{
    MAX_DICTIONARY_SIZE, QUALITY_DEFAULT, QUALITY_MAX, QUALITY_MIN, WINDOW_BITS_DEFAULT,
    WINDOW_BITS_MAX, WINDOW_BITS_MIN,
};
pub use crate::error::{CodecError, EncoderParameter};

pub use self::brotli::Brotli;

// ── Cursors ───────────────────────────────────────────────────────────────────

/// Offsets and remaining lengths into the current input and output chunks.
///
/// Within one step `available_in` and `available_out` only decrease, and
/// `next_in + available_in` / `next_out + available_out` stay constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamCursors {
    pub available_in: usize,
    pub next_in: usize,
    pub available_out: usize,
    pub next_out: usize,
}

impl StreamCursors {
    /// Cursors over a freshly filled input of `input_len` bytes and an empty
    /// output chunk of `output_capacity` bytes.
    pub fn new(input_len: usize, output_capacity: usize) -> Self {
        StreamCursors {
            available_in: input_len,
            next_in: 0,
            available_out: output_capacity,
            next_out: 0,
        }
    }

    /// Number of output bytes produced since the last reset.
    #[inline]
    pub fn produced(&self) -> usize {
        self.next_out
    }

    /// Marks the output chunk as drained.
    #[inline]
    pub fn reset_output(&mut self, capacity: usize) {
        self.available_out = capacity;
        self.next_out = 0;
    }
}

// ── Step vocabulary ───────────────────────────────────────────────────────────

/// Operation requested from the encoder for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOperation {
    /// Consume input, emit whatever output is ready.
    Process,
    /// No more input will follow; flush and close the stream.
    Finish,
}

/// Outcome of one decoder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The end of the compressed stream was reached.
    Done,
    /// All input was consumed; feed the next chunk.
    NeedsInput,
    /// The output chunk is full; drain it and call again with the same input.
    NeedsOutput,
    /// The stream is corrupt.
    Error,
}

// ── Parameters ────────────────────────────────────────────────────────────────

/// Encoder settings applied to a session before any data is fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderParams {
    pub quality: u32,
    pub window_bits: u32,
}

impl Default for EncoderParams {
    fn default() -> Self {
        EncoderParams {
            quality: QUALITY_DEFAULT,
            window_bits: WINDOW_BITS_DEFAULT,
        }
    }
}

impl EncoderParams {
    pub fn new(quality: u32, window_bits: u32) -> Self {
        EncoderParams { quality, window_bits }
    }

    /// Checks both values against the accepted ranges.
    pub fn validate(&self) -> Result<(), CodecError> {
        if !(QUALITY_MIN..=QUALITY_MAX).contains(&self.quality) {
            return Err(CodecError::ParameterRejected {
                parameter: EncoderParameter::Quality,
                value: self.quality,
            });
        }
        if !(WINDOW_BITS_MIN..=WINDOW_BITS_MAX).contains(&self.window_bits) {
            return Err(CodecError::ParameterRejected {
                parameter: EncoderParameter::WindowBits,
                value: self.window_bits,
            });
        }
        Ok(())
    }
}

// ── Dictionary ────────────────────────────────────────────────────────────────

/// Raw shared dictionary, checked once and reusable across sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDictionary {
    bytes: Vec<u8>,
}

impl PreparedDictionary {
    /// Rejects empty dictionaries and dictionaries the format cannot reference.
    pub fn prepare(raw: Vec<u8>) -> Result<Self, CodecError> {
        if raw.is_empty() {
            return Err(CodecError::DictionaryEmpty);
        }
        if raw.len() > MAX_DICTIONARY_SIZE {
            return Err(CodecError::DictionaryTooLarge {
                size: raw.len(),
                max: MAX_DICTIONARY_SIZE,
            });
        }
        Ok(PreparedDictionary { bytes: raw })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ── Session traits ────────────────────────────────────────────────────────────

/// One compression operation's worth of codec state.
pub trait EncoderSession {
    /// Applies one parameter. Must be called before the first step.
    fn set_parameter(&mut self, parameter: EncoderParameter, value: u32) -> Result<(), CodecError>;

    /// Attaches a shared dictionary. Must be called before the first step.
    fn attach_dictionary(&mut self, dictionary: &PreparedDictionary) -> Result<(), CodecError>;

    /// Consumes from `input[cursors.next_in..][..cursors.available_in]` and
    /// writes into `output[cursors.next_out..][..cursors.available_out]`.
    fn compress_step(
        &mut self,
        op: EncodeOperation,
        input: &[u8],
        output: &mut [u8],
        cursors: &mut StreamCursors,
    ) -> Result<(), CodecError>;

    /// The session holds output that did not fit in the last output window.
    fn has_more_output(&self) -> bool;

    /// A `Finish` has been fully processed and all output handed out.
    fn is_finished(&self) -> bool;
}

/// One decompression operation's worth of codec state.
pub trait DecoderSession {
    /// Same cursor contract as [`EncoderSession::compress_step`].
    fn decompress_step(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        cursors: &mut StreamCursors,
    ) -> DecodeStatus;

    /// Total bytes produced by this session so far.
    fn total_out(&self) -> u64;
}

/// Factory for sessions.
pub trait Codec {
    type Encoder: EncoderSession;
    type Decoder: DecoderSession;

    fn create_encoder(&self) -> Result<Self::Encoder, CodecError>;

    /// Decoders take their dictionary at construction time.
    fn create_decoder(
        &self,
        dictionary: Option<&PreparedDictionary>,
    ) -> Result<Self::Decoder, CodecError>;
}
