//! Content digests used to verify round trips.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use xxhash_rust::xxh64::Xxh64;

/// Writer that discards data after folding it into an XXH64 digest.
pub struct HashingWriter {
    state: Xxh64,
    bytes: u64,
}

impl Default for HashingWriter {
    fn default() -> Self {
        HashingWriter {
            state: Xxh64::new(0),
            bytes: 0,
        }
    }
}

impl HashingWriter {
    pub fn new() -> Self {
        HashingWriter::default()
    }

    pub fn digest(&self) -> u64 {
        self.state.digest()
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl Write for HashingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.state.update(buf);
        self.bytes += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// XXH64 (seed 0) of everything `reader` yields.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<u64> {
    let mut sink = HashingWriter::new();
    io::copy(&mut reader, &mut sink)?;
    Ok(sink.digest())
}

pub fn hash_file(path: &Path) -> io::Result<u64> {
    hash_reader(File::open(path)?)
}
