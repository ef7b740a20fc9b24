//! Byte source abstractions for parsing.
//!
//! This module provides the [ByteSource] trait, implemented by
//! [StreamByteSource](crate::parser::StreamByteSource) for arbitrary
//! buffered readers, byte slices of in-memory strings included.

use std::io;

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================T=
/// Trait defining the interface for different byte sources used by
/// [ByteParser](crate::parser::ByteParser).
///
/// Sources only move forward: there is no seeking, so the same parser logic
/// works for in-memory data and for streams that cannot be rewound
/// (pipes, sockets, decompressors).
pub trait ByteSource {
    /// Peek at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    fn peek(&mut self) -> Option<u8>;

    /// Get the current byte and advance the position (consume it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns a slice of up to `k` bytes from the current position
    /// without consuming them.
    fn peek_slice(&mut self, k: usize) -> &[u8];

    /// Returns the number of bytes consumed so far.
    fn position(&self) -> usize;

    /// Check if at end of data.
    fn is_eof(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Takes the first I/O error encountered while reading, if any.
    ///
    /// A source that fails to read behaves as if it reached EOF; the error
    /// is kept so the parser can report it instead of a bogus syntax error.
    fn take_io_error(&mut self) -> Option<io::Error> {
        None
    }
}
