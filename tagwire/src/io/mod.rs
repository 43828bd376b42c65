//! [`Reader`] and [`Writer`] used by tag extensions.
//!
//! Leaf decode transforms receive the not-yet-consumed tail of the input as a
//! `&mut &[u8]` and use [`Reader`] to take exactly the bytes that belong to
//! their field. Leaf encode transforms receive a [`Writer`] for the output.
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadError {
    #[error("Attempting to read {needed} bytes with {available} remaining")]
    ReadSizeLimit { needed: usize, available: usize },
}

pub type ReadResult<T> = core::result::Result<T, ReadError>;

#[cold]
pub const fn read_size_limit(needed: usize, available: usize) -> ReadError {
    ReadError::ReadSizeLimit { needed, available }
}

/// Cursor over the remaining input.
///
/// # Advancement semantics
/// - `peek_*` and [`Reader::remaining`] never advance.
/// - `take_*`, [`Reader::consume`] and [`Reader::skip_prefix`] advance by the
///   number of bytes they return or match.
pub trait Reader<'a> {
    /// The bytes that have not been consumed yet.
    fn remaining(&self) -> &'a [u8];

    /// Return up to `n_bytes` without advancing.
    fn peek_buf(&self, n_bytes: usize) -> &'a [u8] {
        let src = self.remaining();
        &src[..n_bytes.min(src.len())]
    }

    /// Advance by exactly `amt` bytes.
    fn consume(&mut self, amt: usize) -> ReadResult<()>;

    /// Return exactly `n_bytes` and advance past them.
    fn take_exact(&mut self, n_bytes: usize) -> ReadResult<&'a [u8]> {
        let src = self.remaining();
        if src.len() < n_bytes {
            return Err(read_size_limit(n_bytes, src.len()));
        }
        self.consume(n_bytes)?;
        Ok(&src[..n_bytes])
    }

    /// Take bytes up to (not including) the first byte matching `stop`, or
    /// everything if none matches.
    fn take_until(&mut self, stop: impl Fn(u8) -> bool) -> &'a [u8] {
        let src = self.remaining();
        let len = src.iter().position(|&b| stop(b)).unwrap_or(src.len());
        // `len` never exceeds what remains.
        let _ = self.consume(len);
        &src[..len]
    }

    /// Advance past `prefix` if the input starts with it.
    fn skip_prefix(&mut self, prefix: &[u8]) -> bool {
        if !self.remaining().starts_with(prefix) {
            return false;
        }
        self.consume(prefix.len()).is_ok()
    }

    #[inline]
    fn is_exhausted(&self) -> bool {
        self.remaining().is_empty()
    }
}

/// Sink for encoded bytes.
pub trait Writer {
    /// Write all of `src`.
    fn write(&mut self, src: &[u8]);

    fn write_byte(&mut self, byte: u8) {
        self.write(&[byte]);
    }

    fn write_str(&mut self, src: &str) {
        self.write(src.as_bytes());
    }

    /// Write `byte` repeated `count` times.
    fn write_fill(&mut self, byte: u8, count: usize) {
        for _ in 0..count {
            self.write_byte(byte);
        }
    }
}

mod slice;
mod vec;
