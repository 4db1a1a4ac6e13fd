//! Binary buffer reader with cursor tracking.

use std::str;

use crate::BufferError;

/// A binary buffer reader that reads little-endian data from a byte slice.
///
/// The reader maintains a cursor position. Reads never panic: a read that
/// would cross the end of the slice fails with [`BufferError::EndOfBuffer`]
/// and leaves the cursor where it was.
///
/// # Example
///
/// ```
/// use blueprint_pack_buffers::Reader;
///
/// let data = [0x01, 0x04, 0x03, 0x02, 0x01];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u32().unwrap(), 0x01020304);
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Creates a reader positioned at `x`.
    pub fn at(uint8: &'a [u8], x: usize) -> Result<Self, BufferError> {
        let mut reader = Self::new(uint8);
        reader.seek(x)?;
        Ok(reader)
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.uint8.len().saturating_sub(self.x)
    }

    /// Moves the cursor to an absolute position.
    pub fn seek(&mut self, x: usize) -> Result<(), BufferError> {
        if x > self.uint8.len() {
            return Err(BufferError::OutOfRange {
                offset: x,
                len: self.uint8.len(),
            });
        }
        self.x = x;
        Ok(())
    }

    fn ensure(&self, needed: usize) -> Result<(), BufferError> {
        let available = self.size();
        if needed > available {
            return Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed,
                available,
            });
        }
        Ok(())
    }

    /// Reads exactly `N` bytes into an array.
    #[inline]
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.ensure(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    /// Reads a signed 32-bit integer (little-endian).
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    /// Reads an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    /// Reads a signed 64-bit integer (little-endian).
    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    /// Reads a 32-bit floating point number (little-endian).
    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    /// Reads a 64-bit floating point number (little-endian).
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    /// Reads a UTF-8 string of the given byte size.
    ///
    /// On invalid UTF-8 the cursor is not advanced.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        self.ensure(size)?;
        let start = self.x;
        let s = str::from_utf8(&self.uint8[start..start + size])
            .map_err(|_| BufferError::InvalidUtf8 { offset: start })?;
        self.x += size;
        Ok(s)
    }
}
