//! Bounds-checked binary reader with cursor tracking.

use crate::BufferError;

/// A big-endian reader over a borrowed byte slice.
///
/// Every read is bounds-checked: running off the end of the input yields
/// [`BufferError::EndOfBuffer`] carrying the cursor position at which the
/// read was attempted, never a panic.
///
/// # Example
///
/// ```
/// use vpack_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.try_u8().unwrap(), 0x01);
/// assert_eq!(reader.try_u16().unwrap(), 0x0203);
/// assert!(reader.try_u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Number of bytes left after the cursor.
    pub fn size(&self) -> usize {
        self.uint8.len().saturating_sub(self.x)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.size() {
            Err(BufferError::EndOfBuffer { offset: self.x })
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing.
    pub fn try_peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    #[inline]
    pub fn try_u16(&mut self) -> Result<u16, BufferError> {
        Ok(u16::from_be_bytes(self.array::<2>()?))
    }

    #[inline]
    pub fn try_u32(&mut self) -> Result<u32, BufferError> {
        Ok(u32::from_be_bytes(self.array::<4>()?))
    }

    #[inline]
    pub fn try_u64(&mut self) -> Result<u64, BufferError> {
        Ok(u64::from_be_bytes(self.array::<8>()?))
    }

    #[inline]
    pub fn try_f32(&mut self) -> Result<f32, BufferError> {
        Ok(f32::from_be_bytes(self.array::<4>()?))
    }

    #[inline]
    pub fn try_f64(&mut self) -> Result<f64, BufferError> {
        Ok(f64::from_be_bytes(self.array::<8>()?))
    }

    /// Returns the next `size` bytes and advances past them.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let bytes = self.try_buf(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}
