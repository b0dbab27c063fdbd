#![no_main]
use libfuzzer_sys::fuzz_target;

use brbench::codec::Brotli;
use brbench::stream::{decode_stream, StreamOptions};

fuzz_target!(|data: &[u8]| {
    // Any outcome but a panic or a hang is acceptable. The first byte picks
    // the chunk size so tiny chunks get exercised too.
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let mut options = StreamOptions::default();
    options.set_chunk_size(usize::from(first) + 1);
    let mut out = Vec::new();
    let _ = decode_stream(&Brotli, rest, &mut out, None, &options, ());
});
