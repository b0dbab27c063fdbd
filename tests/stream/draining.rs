// Output draining, hang guard and status handling of the driver.

use std::io::{self, Write};

use brbench::codec::{CodecError, EncoderParams};
use brbench::stream::{decode_stream, encode_stream, StreamOptions};
use brbench::Error;

use crate::fake_codec::{fake_encode, Behaviour, FakeCodec};

fn options(chunk_size: usize) -> StreamOptions {
    let mut o = StreamOptions::default();
    o.set_chunk_size(chunk_size);
    o
}

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 7) as u8).collect()
}

/// Records the size of every write call.
#[derive(Default)]
struct RecordingWriter {
    data: Vec<u8>,
    writes: Vec<usize>,
}

impl Write for RecordingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.push(buf.len());
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn trickled_output_is_fully_drained() {
    let codec = FakeCodec::new(Behaviour {
        trickle: 1,
        ..Behaviour::default()
    });
    let data = sample(100);
    let mut out = RecordingWriter::default();
    let stats = encode_stream(
        &codec,
        &data[..],
        &mut out,
        &EncoderParams::default(),
        None,
        &options(16),
        (),
    )
    .unwrap();

    assert_eq!(out.data, fake_encode(&data));
    assert!(out.writes.iter().all(|&n| n == 1));
    assert_eq!(stats.bytes_out, out.data.len() as u64);
    assert!(stats.codec_calls >= out.data.len() as u64);
}

#[test]
fn no_write_exceeds_one_chunk() {
    let codec = FakeCodec::default();
    let data = vec![0u8; 1000];
    let mut out = RecordingWriter::default();
    encode_stream(
        &codec,
        &data[..],
        &mut out,
        &EncoderParams::default(),
        None,
        &options(64),
        (),
    )
    .unwrap();
    assert_eq!(out.data, fake_encode(&data));
    assert!(out.writes.iter().all(|&n| n > 0 && n <= 64));

    let mut back = RecordingWriter::default();
    decode_stream(&codec, &out.data[..], &mut back, None, &options(64), ()).unwrap();
    assert_eq!(back.data, data);
    assert!(back.writes.iter().all(|&n| n > 0 && n <= 64));
}

#[test]
fn exact_multiple_of_chunk_is_finished() {
    let codec = FakeCodec::default();
    let data = sample(32);
    let mut out = Vec::new();
    let stats = encode_stream(
        &codec,
        &data[..],
        &mut out,
        &EncoderParams::default(),
        None,
        &options(8),
        (),
    )
    .unwrap();
    assert_eq!(out, fake_encode(&data));
    assert_eq!(stats.chunks, 5);
    assert!(codec.counters.finish_steps.get() >= 1);
}

#[test]
fn empty_input_is_finished() {
    let codec = FakeCodec::default();
    let mut out = Vec::new();
    let stats = encode_stream(
        &codec,
        &b""[..],
        &mut out,
        &EncoderParams::default(),
        None,
        &options(8),
        (),
    )
    .unwrap();
    assert_eq!(out, vec![0, 0]);
    assert_eq!(stats.bytes_in, 0);
    assert_eq!(stats.chunks, 1);
}

#[test]
fn decoder_needs_output_with_one_byte_chunks() {
    let codec = FakeCodec::default();
    let data = sample(50);
    let encoded = fake_encode(&data);
    let mut out = Vec::new();
    let stats = decode_stream(&codec, &encoded[..], &mut out, None, &options(1), ()).unwrap();
    assert_eq!(out, data);
    assert_eq!(stats.bytes_in, encoded.len() as u64);
}

#[test]
fn stalled_encoder_is_reported() {
    let codec = FakeCodec::new(Behaviour {
        stall_encoder: true,
        ..Behaviour::default()
    });
    let err = encode_stream(
        &codec,
        &b"abc"[..],
        &mut Vec::new(),
        &EncoderParams::default(),
        None,
        &options(8),
        (),
    )
    .unwrap_err();
    assert_eq!(err.as_codec(), Some(&CodecError::Stalled));
}

#[test]
fn stalled_decoder_is_reported() {
    let codec = FakeCodec::new(Behaviour {
        stall_decoder: true,
        ..Behaviour::default()
    });
    let err = decode_stream(&codec, &b"abc"[..], &mut Vec::new(), None, &options(8), ())
        .unwrap_err();
    assert_eq!(err.as_codec(), Some(&CodecError::Stalled));
}

#[test]
fn corrupt_stream_fails() {
    let codec = FakeCodec::default();
    let mut out = Vec::new();
    let err = decode_stream(&codec, &[b'x', 0, 5, 0, 0][..], &mut out, None, &options(8), ())
        .unwrap_err();
    assert_eq!(err.as_codec(), Some(&CodecError::StreamFailed));
}

#[test]
fn missing_end_marker_is_truncation() {
    let codec = FakeCodec::default();
    let mut encoded = fake_encode(b"hello");
    encoded.truncate(encoded.len() - 1);
    let mut out = Vec::new();
    let err = decode_stream(&codec, &encoded[..], &mut out, None, &options(3), ()).unwrap_err();
    assert!(matches!(err, Error::Truncated { bytes_in } if bytes_in == encoded.len() as u64));
    assert_eq!(out, b"hello");
}

#[test]
fn empty_compressed_input_is_truncation() {
    let codec = FakeCodec::default();
    let err = decode_stream(&codec, &b""[..], &mut Vec::new(), None, &options(8), ()).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn bytes_after_end_of_stream_are_ignored() {
    let codec = FakeCodec::default();
    let mut encoded = fake_encode(b"payload");
    encoded.extend_from_slice(b"trailing junk");
    let mut out = Vec::new();
    decode_stream(&codec, &encoded[..], &mut out, None, &options(4), ()).unwrap();
    assert_eq!(out, b"payload");
}
