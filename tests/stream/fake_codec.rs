// Scripted codec used to drive the streaming loop through edge cases.
//
// Wire format: every payload byte is copied, 0x00 is escaped as 0x00 0x01,
// and the stream ends with 0x00 0x00. The encoder hands out at most
// `trickle` bytes per step so pending output has to be drained over several
// calls.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use brbench::codec::{
    Codec, CodecError, DecodeStatus, DecoderSession, EncodeOperation, EncoderParameter,
    EncoderSession, PreparedDictionary, StreamCursors,
};

#[derive(Debug, Default)]
pub struct Counters {
    pub encoders_created: Cell<u32>,
    pub encoders_dropped: Cell<u32>,
    pub decoders_created: Cell<u32>,
    pub decoders_dropped: Cell<u32>,
    pub steps: Cell<u64>,
    pub finish_steps: Cell<u64>,
    pub dictionary_attached: Cell<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct Behaviour {
    /// Maximum output bytes per step; 0 means unlimited.
    pub trickle: usize,
    /// Fail the n-th step (1-based).
    pub fail_at_step: Option<u64>,
    /// Encoder claims pending output but never makes progress.
    pub stall_encoder: bool,
    /// Decoder asks for output space but never makes progress.
    pub stall_decoder: bool,
    /// Reject every parameter.
    pub reject_parameters: bool,
    /// Refuse to create sessions.
    pub refuse_sessions: bool,
}

#[derive(Debug, Default)]
pub struct FakeCodec {
    pub counters: Rc<Counters>,
    pub behaviour: Behaviour,
}

impl FakeCodec {
    pub fn new(behaviour: Behaviour) -> Self {
        FakeCodec {
            counters: Rc::new(Counters::default()),
            behaviour,
        }
    }
}

impl Codec for FakeCodec {
    type Encoder = FakeEncoder;
    type Decoder = FakeDecoder;

    fn create_encoder(&self) -> Result<FakeEncoder, CodecError> {
        if self.behaviour.refuse_sessions {
            return Err(CodecError::SessionCreate);
        }
        bump(&self.counters.encoders_created);
        Ok(FakeEncoder {
            counters: self.counters.clone(),
            behaviour: self.behaviour.clone(),
            pending: VecDeque::new(),
            marker_queued: false,
            finished: false,
        })
    }

    fn create_decoder(
        &self,
        _dictionary: Option<&PreparedDictionary>,
    ) -> Result<FakeDecoder, CodecError> {
        if self.behaviour.refuse_sessions {
            return Err(CodecError::SessionCreate);
        }
        bump(&self.counters.decoders_created);
        Ok(FakeDecoder {
            counters: self.counters.clone(),
            behaviour: self.behaviour.clone(),
            escaped: false,
            done: false,
            total_out: 0,
        })
    }
}

fn bump(c: &Cell<u32>) {
    c.set(c.get() + 1);
}

fn step(counters: &Counters, behaviour: &Behaviour) -> bool {
    let n = counters.steps.get() + 1;
    counters.steps.set(n);
    behaviour.fail_at_step == Some(n)
}

pub struct FakeEncoder {
    counters: Rc<Counters>,
    behaviour: Behaviour,
    pending: VecDeque<u8>,
    marker_queued: bool,
    finished: bool,
}

impl EncoderSession for FakeEncoder {
    fn set_parameter(&mut self, parameter: EncoderParameter, value: u32) -> Result<(), CodecError> {
        if self.behaviour.reject_parameters {
            return Err(CodecError::ParameterRejected { parameter, value });
        }
        Ok(())
    }

    fn attach_dictionary(&mut self, _dictionary: &PreparedDictionary) -> Result<(), CodecError> {
        self.counters.dictionary_attached.set(true);
        Ok(())
    }

    fn compress_step(
        &mut self,
        op: EncodeOperation,
        input: &[u8],
        output: &mut [u8],
        cursors: &mut StreamCursors,
    ) -> Result<(), CodecError> {
        if step(&self.counters, &self.behaviour) {
            return Err(CodecError::StreamFailed);
        }
        if op == EncodeOperation::Finish {
            self.counters.finish_steps.set(self.counters.finish_steps.get() + 1);
        }
        if self.behaviour.stall_encoder {
            self.pending.push_back(0xAA);
            return Ok(());
        }

        let end = cursors.next_in + cursors.available_in;
        for &b in &input[cursors.next_in..end] {
            self.pending.push_back(b);
            if b == 0 {
                self.pending.push_back(1);
            }
        }
        cursors.next_in = end;
        cursors.available_in = 0;

        if op == EncodeOperation::Finish && !self.marker_queued {
            self.pending.extend([0, 0]);
            self.marker_queued = true;
        }

        let mut n = self.pending.len().min(cursors.available_out);
        if self.behaviour.trickle > 0 {
            n = n.min(self.behaviour.trickle);
        }
        for slot in &mut output[cursors.next_out..cursors.next_out + n] {
            *slot = self.pending.pop_front().unwrap_or_default();
        }
        cursors.next_out += n;
        cursors.available_out -= n;

        if self.marker_queued && self.pending.is_empty() {
            self.finished = true;
        }
        Ok(())
    }

    fn has_more_output(&self) -> bool {
        !self.pending.is_empty()
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for FakeEncoder {
    fn drop(&mut self) {
        bump(&self.counters.encoders_dropped);
    }
}

pub struct FakeDecoder {
    counters: Rc<Counters>,
    behaviour: Behaviour,
    escaped: bool,
    done: bool,
    total_out: u64,
}

impl DecoderSession for FakeDecoder {
    fn decompress_step(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        cursors: &mut StreamCursors,
    ) -> DecodeStatus {
        if step(&self.counters, &self.behaviour) {
            return DecodeStatus::Error;
        }
        if self.behaviour.stall_decoder {
            return DecodeStatus::NeedsOutput;
        }
        loop {
            if self.done {
                return DecodeStatus::Done;
            }
            if cursors.available_in == 0 {
                return DecodeStatus::NeedsInput;
            }
            let b = input[cursors.next_in];
            let literal = match (self.escaped, b) {
                (false, 0) => None,
                (false, b) => Some(b),
                (true, 0) => {
                    self.done = true;
                    None
                }
                (true, 1) => Some(0),
                (true, _) => return DecodeStatus::Error,
            };
            if let Some(out) = literal {
                if cursors.available_out == 0 {
                    return DecodeStatus::NeedsOutput;
                }
                output[cursors.next_out] = out;
                cursors.next_out += 1;
                cursors.available_out -= 1;
                self.total_out += 1;
                self.escaped = false;
            } else if !self.done {
                self.escaped = true;
            }
            cursors.next_in += 1;
            cursors.available_in -= 1;
        }
    }

    fn total_out(&self) -> u64 {
        self.total_out
    }
}

impl Drop for FakeDecoder {
    fn drop(&mut self) {
        bump(&self.counters.decoders_dropped);
    }
}

/// Reference encoding of `data` in the fake wire format.
pub fn fake_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 2);
    for &b in data {
        out.push(b);
        if b == 0 {
            out.push(1);
        }
    }
    out.extend([0, 0]);
    out
}
