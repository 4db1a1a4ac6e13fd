//! Little-endian binary buffer utilities for blueprint packs.
//!
//! # Overview
//!
//! - [`Reader`] - Reads little-endian data from a byte slice with cursor tracking
//! - [`Writer`] - Writes little-endian data to an auto-growing buffer
//!
//! Every `Reader` read is bounds-checked and returns a [`BufferError`] instead
//! of panicking, so a truncated archive surfaces as an error carrying the
//! offset of the failed read.
//!
//! # Example
//!
//! ```
//! use blueprint_pack_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.i32(-2);
//! writer.utf8("hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! assert_eq!(reader.i32().unwrap(), -2);
//! assert_eq!(reader.utf8(5).unwrap(), "hello");
//! assert!(reader.u8().is_err());
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// Invalid UTF-8 sequence.
    InvalidUtf8 { offset: usize },
    /// Attempted to move the cursor outside the buffer.
    OutOfRange { offset: usize, len: usize },
}

impl BufferError {
    /// Byte offset at which the failing operation started.
    pub fn offset(&self) -> usize {
        match self {
            BufferError::EndOfBuffer { offset, .. }
            | BufferError::InvalidUtf8 { offset }
            | BufferError::OutOfRange { offset, .. } => *offset,
        }
    }
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer {
                offset,
                needed,
                available,
            } => write!(
                f,
                "end of buffer at offset {offset}: needed {needed} bytes, {available} available"
            ),
            BufferError::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 sequence at offset {offset}")
            }
            BufferError::OutOfRange { offset, len } => {
                write!(f, "offset {offset} is outside a buffer of {len} bytes")
            }
        }
    }
}

impl std::error::Error for BufferError {}
