//! Fixed-capacity byte buffer reused across driver iterations.

use std::io::{self, Read};

/// A buffer of `capacity` bytes plus a logical length.
///
/// Allocated once per driver invocation; [`ByteChunk::clear`] and
/// [`ByteChunk::fill_from`] reuse the allocation.
#[derive(Debug)]
pub struct ByteChunk {
    buf: Box<[u8]>,
    len: usize,
}

impl ByteChunk {
    /// Allocates a zeroed chunk. A capacity of 0 is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteChunk {
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            len: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// The logically filled prefix.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The whole backing buffer, regardless of logical length.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// The whole backing buffer, read-only.
    #[inline]
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// Sets the logical length after the buffer was written directly.
    pub fn set_len(&mut self, len: usize) {
        assert!(len <= self.capacity(), "chunk length exceeds capacity");
        self.len = len;
    }

    /// Clears the chunk and reads from `src` until it is full or `src` reports EOF.
    ///
    /// Short reads are retried, and so are `Interrupted` errors; any other
    /// error is returned with the bytes read so far discarded. Returns the
    /// number of bytes now held.
    pub fn fill_from<R: Read + ?Sized>(&mut self, src: &mut R) -> io::Result<usize> {
        self.len = 0;
        while self.len < self.buf.len() {
            match src.read(&mut self.buf[self.len..]) {
                Ok(0) => break,
                Ok(n) => self.len += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.len = 0;
                    return Err(e);
                }
            }
        }
        Ok(self.len)
    }
}
