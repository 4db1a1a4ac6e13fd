//! Binary buffer writer with automatic growth.

/// A little-endian binary writer backed by a growable buffer.
///
/// Used to assemble archive fixtures; every method mirrors a [`Reader`]
/// read so a value written here reads back unchanged.
///
/// [`Reader`]: crate::Reader
#[derive(Debug, Clone, Default)]
pub struct Writer {
    /// The underlying buffer.
    pub uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::with_alloc_size(64)
    }

    /// Creates an empty writer with a pre-allocated capacity.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(alloc_size),
        }
    }

    /// Current write position (number of bytes written).
    pub fn x(&self) -> usize {
        self.uint8.len()
    }

    /// Discards everything written so far.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Returns the written bytes and resets the writer.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    pub fn u8(&mut self, value: u8) {
        self.uint8.push(value);
    }

    pub fn u32(&mut self, value: u32) {
        self.uint8.extend_from_slice(&value.to_le_bytes());
    }

    pub fn i32(&mut self, value: i32) {
        self.uint8.extend_from_slice(&value.to_le_bytes());
    }

    pub fn u64(&mut self, value: u64) {
        self.uint8.extend_from_slice(&value.to_le_bytes());
    }

    pub fn i64(&mut self, value: i64) {
        self.uint8.extend_from_slice(&value.to_le_bytes());
    }

    pub fn f32(&mut self, value: f32) {
        self.uint8.extend_from_slice(&value.to_le_bytes());
    }

    pub fn f64(&mut self, value: f64) {
        self.uint8.extend_from_slice(&value.to_le_bytes());
    }

    /// Appends raw bytes.
    pub fn buf(&mut self, data: &[u8]) {
        self.uint8.extend_from_slice(data);
    }

    /// Appends the UTF-8 bytes of `s` without a length prefix; returns the
    /// number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.uint8.extend_from_slice(s.as_bytes());
        s.len()
    }

    /// Overwrites four bytes at `x` with a little-endian `u32`.
    ///
    /// Used to back-patch offsets once the target position is known.
    /// Panics if `x + 4` exceeds the written length.
    pub fn patch_u32(&mut self, x: usize, value: u32) {
        self.uint8[x..x + 4].copy_from_slice(&value.to_le_bytes());
    }
}
