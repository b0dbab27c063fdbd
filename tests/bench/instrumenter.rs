// Instrumenter over the scripted codec.

use brbench::bench::{Direction, Instrumenter};
use brbench::codec::{CodecError, EncoderParams};
use brbench::stream::StreamOptions;
use brbench::timefn::Phase;

use crate::fake_codec::{fake_encode, Behaviour, FakeCodec};
use crate::oracle::{Frozen, Ticking};

#[test]
fn records_sizes_and_settings() {
    let inst = Instrumenter::with_codec(Frozen, FakeCodec::default());
    let data = b"a\0b\0c".repeat(40);
    let mut packed = Vec::new();

    let record = inst
        .compress("abc", &data[..], &mut packed, &EncoderParams::new(3, 20), None)
        .unwrap();
    assert_eq!(packed, fake_encode(&data));
    assert_eq!(record.identity, "abc");
    assert_eq!(record.direction, Direction::Compress);
    assert_eq!(record.original_size, data.len() as u64);
    assert_eq!(record.compressed_size, packed.len() as u64);
    assert_eq!((record.quality, record.window_bits), (3, 20));
    assert_eq!(record.peak_rss_kb, 2048);
    assert_eq!(record.cpu_usage_percent, 0.0);
    assert_eq!(record.system_cpu_percent, 0.0);
    assert!(record.compression_ratio() < 1.0);
}

#[test]
fn decompress_swaps_sides() {
    let inst = Instrumenter::with_codec(Frozen, FakeCodec::default());
    let data = vec![9u8; 300];
    let packed = fake_encode(&data);
    let mut out = Vec::new();

    let record = inst.decompress("nines.br", &packed[..], &mut out, None).unwrap();
    assert_eq!(out, data);
    assert_eq!(record.direction, Direction::Decompress);
    assert_eq!(record.original_size, 300);
    assert_eq!(record.compressed_size, packed.len() as u64);
    assert_eq!((record.quality, record.window_bits), (0, 0));
}

#[test]
fn phases_fit_in_wall_time() {
    let mut inst = Instrumenter::with_codec(Ticking::default(), FakeCodec::default());
    let mut options = StreamOptions::default();
    options.set_chunk_size(7);
    inst.set_stream_options(options);
    assert_eq!(inst.stream_options().chunk_size, 7);

    let data = vec![1u8; 1000];
    let record = inst
        .compress("ones", &data[..], &mut Vec::new(), &EncoderParams::default(), None)
        .unwrap();
    let phases = Phase::ALL.iter().map(|&p| record.phases.get(p)).sum::<u64>();
    assert!(phases <= record.phases.total_ns);
    assert!(record.codec_secs() <= record.total_secs());
    assert!((record.system_cpu_percent - 25.0).abs() < 1e-9);
    assert_eq!(record.peak_rss_kb, 4097);
    assert!(record.cpu_usage_percent >= 0.0);
}

#[test]
fn codec_failure_is_propagated_and_session_released() {
    let codec = FakeCodec::new(Behaviour {
        fail_at_step: Some(1),
        ..Behaviour::default()
    });
    let counters = codec.counters.clone();
    let inst = Instrumenter::with_codec(Frozen, codec);

    let err = inst
        .compress("x", &b"abc"[..], &mut Vec::new(), &EncoderParams::default(), None)
        .unwrap_err();
    assert_eq!(err.as_codec(), Some(&CodecError::StreamFailed));
    assert_eq!(counters.encoders_created.get(), 1);
    assert_eq!(counters.encoders_dropped.get(), 1);
}
