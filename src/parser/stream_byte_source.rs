//! Streaming implementation of byte source for parsing.
//!
//! This module provides [StreamByteSource], which wraps any [BufRead]
//! (an opened file, standard input, a `&[u8]`, a borrowed `&mut` reader).
//! Bytes are read straight out of the reader's own buffer and consumed
//! from the reader one at a time as the parser takes them.

use std::io::{self, BufRead};

use crate::parser::byte_source::ByteSource;

// =#========================================================================#=
// STREAM BYTE SOURCE
// =#========================================================================$=
/// A forward-only byte source over a buffered reader.
///
/// The reader only advances past bytes the parser has consumed, so a
/// borrowed reader handed back to its owner continues right after the last
/// tree statement parsed. The one exception is a multi-byte look-ahead
/// reaching over the end of the reader's current chunk: the missing bytes
/// are moved into a small spill buffer, and are lost to the reader if the
/// source is dropped before consuming them.
///
/// # Example
/// ```
/// use phyloio::parser::{ByteSource, StreamByteSource};
///
/// let mut reader = &b"TREE t = (A,B);"[..];
/// {
///     let mut source = StreamByteSource::new(&mut reader);
///     assert_eq!(source.peek_slice(4), b"TREE");
///     source.next_byte();
/// }
/// assert_eq!(reader, b"REE t = (A,B);");
/// ```
pub struct StreamByteSource<R: BufRead> {
    /// Underlying reader
    reader: R,
    /// Bytes taken out of the reader for a look-ahead, not yet consumed
    spill: Vec<u8>,
    /// Index of the next unconsumed byte in `spill`
    head: usize,
    /// Absolute number of bytes consumed
    pos: usize,
    /// Reader returned EOF or failed
    exhausted: bool,
    /// First read error, kept for reporting
    io_error: Option<io::Error>,
}

impl<R: BufRead> StreamByteSource<R> {
    /// Creates a new byte source reading from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            spill: Vec::new(),
            head: 0,
            pos: 0,
            exhausted: false,
            io_error: None,
        }
    }

    /// Number of spilled but unconsumed bytes.
    #[inline]
    fn spilled(&self) -> usize {
        self.spill.len() - self.head
    }

    /// Makes sure the reader has a non-empty chunk buffered.
    ///
    /// Returns `false` once the reader is at EOF or failed.
    fn ensure_chunk(&mut self) -> bool {
        while !self.exhausted {
            match self.reader.fill_buf() {
                Ok(chunk) => {
                    if !chunk.is_empty() {
                        return true;
                    }
                    self.exhausted = true;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.io_error = Some(e);
                    self.exhausted = true;
                }
            }
        }
        false
    }

    /// Moves bytes from the reader into the spill buffer until it holds
    /// `k` unconsumed bytes or the reader is exhausted. Never takes more
    /// from the reader than needed.
    fn spill_up_to(&mut self, k: usize) {
        if self.head > 0 {
            self.spill.drain(..self.head);
            self.head = 0;
        }

        while self.spill.len() < k && self.ensure_chunk() {
            let Ok(chunk) = self.reader.fill_buf() else {
                break;
            };
            let n = chunk.len().min(k - self.spill.len());
            self.spill.extend_from_slice(&chunk[..n]);
            self.reader.consume(n);
        }
    }
}

impl<R: BufRead> ByteSource for StreamByteSource<R> {
    #[inline]
    fn peek(&mut self) -> Option<u8> {
        if let Some(&byte) = self.spill.get(self.head) {
            return Some(byte);
        }
        if !self.ensure_chunk() {
            return None;
        }
        self.reader.fill_buf().ok()?.first().copied()
    }

    #[inline]
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        if self.spilled() > 0 {
            self.head += 1;
            if self.head == self.spill.len() {
                self.spill.clear();
                self.head = 0;
            }
        } else {
            self.reader.consume(1);
        }
        self.pos += 1;
        Some(byte)
    }

    fn peek_slice(&mut self, k: usize) -> &[u8] {
        if self.spilled() == 0 && self.ensure_chunk() {
            let chunk_len = self.reader.fill_buf().map_or(0, |chunk| chunk.len());
            if chunk_len >= k {
                return match self.reader.fill_buf() {
                    Ok(chunk) => &chunk[..k],
                    Err(_) => &[],
                };
            }
        }

        // Look-ahead reaches over the end of the reader's chunk
        self.spill_up_to(k);
        let end = (self.head + k).min(self.spill.len());
        &self.spill[self.head..end]
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn take_io_error(&mut self) -> Option<io::Error> {
        self.io_error.take()
    }
}
