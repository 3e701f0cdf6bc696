//! Binary buffer writer with auto-growing capacity.

/// An append-only big-endian byte writer.
///
/// Encoders keep one `Writer` per encoder instance and call [`Writer::flush`]
/// after each top-level value, which hands out the written bytes and leaves
/// the allocation in place for the next value.
///
/// # Example
///
/// ```
/// use vpack_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0203);
/// assert_eq!(writer.flush(), [0x01, 0x02, 0x03]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Discards everything written since the last flush.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Returns the written bytes, keeping the allocation for reuse.
    pub fn flush(&mut self) -> Vec<u8> {
        let out = self.uint8.clone();
        self.uint8.clear();
        out
    }

    /// Consumes the writer and returns the written bytes without copying.
    pub fn into_inner(self) -> Vec<u8> {
        self.uint8
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a u8 followed by a big-endian u16.
    pub fn u8u16(&mut self, head: u8, val: u16) {
        self.u8(head);
        self.u16(val);
    }

    /// Writes a u8 followed by a big-endian u32.
    pub fn u8u32(&mut self, head: u8, val: u32) {
        self.u8(head);
        self.u32(val);
    }

    /// Writes a u8 followed by a big-endian u64.
    pub fn u8u64(&mut self, head: u8, val: u64) {
        self.u8(head);
        self.u64(val);
    }

    /// Writes a u8 followed by a big-endian f32.
    pub fn u8f32(&mut self, head: u8, val: f32) {
        self.u8(head);
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a u8 followed by a big-endian f64.
    pub fn u8f64(&mut self, head: u8, val: f64) {
        self.u8(head);
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    pub fn buf(&mut self, buf: &[u8]) {
        self.uint8.extend_from_slice(buf);
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.uint8.extend_from_slice(s.as_bytes());
        s.len()
    }
}
