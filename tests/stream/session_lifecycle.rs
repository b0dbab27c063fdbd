// Every session the driver creates is released exactly once, whatever the
// exit path.

use std::io::{self, Read, Write};

use brbench::codec::{CodecError, EncoderParameter, EncoderParams, PreparedDictionary};
use brbench::stream::{decode_stream, encode_stream, StreamOptions};
use brbench::Error;

use crate::fake_codec::{fake_encode, Behaviour, FakeCodec};

fn options(chunk_size: usize) -> StreamOptions {
    let mut o = StreamOptions::default();
    o.set_chunk_size(chunk_size);
    o
}

struct FailingReader {
    remaining_ok: usize,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining_ok == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "disk gone"));
        }
        let n = buf.len().min(self.remaining_ok);
        buf[..n].fill(b'a');
        self.remaining_ok -= n;
        Ok(n)
    }
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn assert_encoders_balanced(codec: &FakeCodec, expected: u32) {
    assert_eq!(codec.counters.encoders_created.get(), expected);
    assert_eq!(codec.counters.encoders_dropped.get(), expected);
}

fn assert_decoders_balanced(codec: &FakeCodec, expected: u32) {
    assert_eq!(codec.counters.decoders_created.get(), expected);
    assert_eq!(codec.counters.decoders_dropped.get(), expected);
}

#[test]
fn released_after_success() {
    let codec = FakeCodec::default();
    let mut packed = Vec::new();
    encode_stream(
        &codec,
        &b"some data"[..],
        &mut packed,
        &EncoderParams::default(),
        None,
        &options(4),
        (),
    )
    .unwrap();
    assert_encoders_balanced(&codec, 1);

    decode_stream(&codec, &packed[..], &mut Vec::new(), None, &options(4), ()).unwrap();
    assert_decoders_balanced(&codec, 1);
}

#[test]
fn released_after_codec_error() {
    let codec = FakeCodec::new(Behaviour {
        fail_at_step: Some(3),
        ..Behaviour::default()
    });
    let err = encode_stream(
        &codec,
        &[1u8; 64][..],
        &mut Vec::new(),
        &EncoderParams::default(),
        None,
        &options(8),
        (),
    )
    .unwrap_err();
    assert_eq!(err.as_codec(), Some(&CodecError::StreamFailed));
    assert_encoders_balanced(&codec, 1);

    let codec = FakeCodec::new(Behaviour {
        fail_at_step: Some(2),
        ..Behaviour::default()
    });
    let packed = fake_encode(&[1u8; 64]);
    let err = decode_stream(&codec, &packed[..], &mut Vec::new(), None, &options(8), ())
        .unwrap_err();
    assert_eq!(err.as_codec(), Some(&CodecError::StreamFailed));
    assert_decoders_balanced(&codec, 1);
}

#[test]
fn released_after_read_error() {
    let codec = FakeCodec::default();
    let err = encode_stream(
        &codec,
        FailingReader { remaining_ok: 10 },
        &mut Vec::new(),
        &EncoderParams::default(),
        None,
        &options(4),
        (),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert_encoders_balanced(&codec, 1);

    let err = decode_stream(
        &codec,
        FailingReader { remaining_ok: 0 },
        &mut Vec::new(),
        None,
        &options(4),
        (),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert_decoders_balanced(&codec, 1);
}

#[test]
fn released_after_write_error() {
    let codec = FakeCodec::default();
    let err = encode_stream(
        &codec,
        &b"abc"[..],
        FailingWriter,
        &EncoderParams::default(),
        None,
        &options(4),
        (),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert_encoders_balanced(&codec, 1);

    let packed = fake_encode(b"abc");
    let err = decode_stream(&codec, &packed[..], FailingWriter, None, &options(4), ())
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert_decoders_balanced(&codec, 1);
}

#[test]
fn released_after_parameter_rejection() {
    let codec = FakeCodec::new(Behaviour {
        reject_parameters: true,
        ..Behaviour::default()
    });
    let err = encode_stream(
        &codec,
        &b"abc"[..],
        &mut Vec::new(),
        &EncoderParams::default(),
        None,
        &options(4),
        (),
    )
    .unwrap_err();
    assert_eq!(
        err.as_codec(),
        Some(&CodecError::ParameterRejected {
            parameter: EncoderParameter::Quality,
            value: 6
        })
    );
    assert_encoders_balanced(&codec, 1);
    assert_eq!(codec.counters.steps.get(), 0);
}

#[test]
fn invalid_params_never_create_a_session() {
    let codec = FakeCodec::default();
    let mut out = Vec::new();
    let err = encode_stream(
        &codec,
        &b"abc"[..],
        &mut out,
        &EncoderParams::new(12, 16),
        None,
        &options(4),
        (),
    )
    .unwrap_err();
    assert!(matches!(
        err.as_codec(),
        Some(CodecError::ParameterRejected { .. })
    ));
    assert_encoders_balanced(&codec, 0);
    assert!(out.is_empty());
}

#[test]
fn refused_session_is_reported() {
    let codec = FakeCodec::new(Behaviour {
        refuse_sessions: true,
        ..Behaviour::default()
    });
    let err = encode_stream(
        &codec,
        &b"abc"[..],
        &mut Vec::new(),
        &EncoderParams::default(),
        None,
        &options(4),
        (),
    )
    .unwrap_err();
    assert_eq!(err.as_codec(), Some(&CodecError::SessionCreate));

    let err = decode_stream(&codec, &b"abc"[..], &mut Vec::new(), None, &options(4), ())
        .unwrap_err();
    assert_eq!(err.as_codec(), Some(&CodecError::SessionCreate));
    assert_encoders_balanced(&codec, 0);
    assert_decoders_balanced(&codec, 0);
}

#[test]
fn dictionary_is_attached_before_streaming() {
    let codec = FakeCodec::default();
    let dict = PreparedDictionary::prepare(b"shared".to_vec()).unwrap();
    encode_stream(
        &codec,
        &b"abc"[..],
        &mut Vec::new(),
        &EncoderParams::default(),
        Some(&dict),
        &options(4),
        (),
    )
    .unwrap();
    assert!(codec.counters.dictionary_attached.get());
    assert_encoders_balanced(&codec, 1);
}
