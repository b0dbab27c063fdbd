#![no_main]
use libfuzzer_sys::fuzz_target;

use brbench::codec::{Brotli, EncoderParams};
use brbench::stream::{decode_stream, encode_stream, StreamOptions};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let params = EncoderParams::new(u32::from(data[0] % 12), 10 + u32::from(data[1] % 15));
    let mut options = StreamOptions::default();
    options.set_chunk_size(1 + usize::from(data[0]) * 37);
    let payload = &data[2..];

    let mut packed = Vec::new();
    encode_stream(&Brotli, payload, &mut packed, &params, None, &options, ()).unwrap();
    let mut unpacked = Vec::new();
    decode_stream(&Brotli, &packed[..], &mut unpacked, None, &options, ()).unwrap();
    assert_eq!(unpacked, payload);
});
