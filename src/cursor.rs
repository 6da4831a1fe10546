//! Bounds-checked sequential access to byte buffers.
//!
//! [`ByteCursor`] reads from a borrowed buffer and hands out sub-slices that
//! keep the buffer's lifetime, so parsed records can point into the input
//! without copying. [`ByteWriter`] appends to an owned `Vec<u8>`.

use alloc::vec::Vec;

use crate::error::CodecError;

/// Byte order of multi-byte header fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

/// Read cursor over an immutable byte buffer.
///
/// Every read either returns exactly the requested bytes and advances,
/// or fails with [`CodecError::TruncatedInput`] and leaves the position
/// unchanged.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Count of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether every byte has been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    /// The whole underlying buffer.
    #[inline]
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    /// Return the next `n` bytes and advance past them.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let available = self.remaining();
        if n > available {
            return Err(CodecError::TruncatedInput {
                offset: self.pos,
                needed: n,
                available,
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read(1)?[0])
    }

    /// Read a 4-byte unsigned integer.
    #[inline]
    pub fn read_u32(&mut self, endian: Endian) -> Result<u32, CodecError> {
        // read_uint(4, ..) never exceeds u32::MAX
        Ok(self.read_uint(4, endian)? as u32)
    }

    /// Read an unsigned integer `width` bytes wide.
    ///
    /// # Panics
    ///
    /// Panics if `width` is not in `1..=8`.
    pub fn read_uint(&mut self, width: usize, endian: Endian) -> Result<u64, CodecError> {
        assert!(
            (1..=8).contains(&width),
            "integer width {width} not in 1..=8"
        );
        let bytes = self.read(width)?;
        let value = match endian {
            Endian::Little => bytes
                .iter()
                .rev()
                .fold(0u64, |acc, &b| (acc << 8) | b as u64),
            Endian::Big => bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64),
        };
        Ok(value)
    }
}

/// Append-only writer over an owned output buffer.
#[derive(Debug)]
pub struct ByteWriter<'v> {
    out: &'v mut Vec<u8>,
}

impl<'v> ByteWriter<'v> {
    /// Wrap `out`; writes are appended after its current contents.
    pub fn new(out: &'v mut Vec<u8>) -> Self {
        Self { out }
    }

    /// Bytes in the underlying buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Whether the underlying buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Append raw bytes.
    #[inline]
    pub fn write(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Append `n` zero bytes.
    #[inline]
    pub fn write_zeros(&mut self, n: usize) {
        self.out.resize(self.out.len() + n, 0);
    }

    /// Append a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.out.push(value);
    }

    /// Append a 4-byte unsigned integer.
    #[inline]
    pub fn write_u32(&mut self, value: u32, endian: Endian) {
        match endian {
            Endian::Little => self.write(&value.to_le_bytes()),
            Endian::Big => self.write(&value.to_be_bytes()),
        }
    }

    /// Append the low `width` bytes of `value`.
    ///
    /// # Panics
    ///
    /// Panics if `width` is not in `1..=8`.
    pub fn write_uint(&mut self, value: u64, width: usize, endian: Endian) {
        assert!(
            (1..=8).contains(&width),
            "integer width {width} not in 1..=8"
        );
        match endian {
            Endian::Little => self.write(&value.to_le_bytes()[..width]),
            Endian::Big => self.write(&value.to_be_bytes()[8 - width..]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn read_advances_exactly() {
        let data = [1u8, 2, 3, 4, 5];
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read(2).unwrap(), &[1, 2]);
        assert_eq!(c.position(), 2);
        assert_eq!(c.remaining(), 3);
        assert_eq!(c.read(3).unwrap(), &[3, 4, 5]);
        assert!(c.at_end());
    }

    #[test]
    fn short_read_fails_without_moving() {
        let data = [1u8, 2, 3];
        let mut c = ByteCursor::new(&data);
        c.read(1).unwrap();
        let err = c.read(3).unwrap_err();
        assert_eq!(
            err,
            CodecError::TruncatedInput {
                offset: 1,
                needed: 3,
                available: 2
            }
        );
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn zero_length_read_at_end() {
        let mut c = ByteCursor::new(&[]);
        assert!(c.at_end());
        assert_eq!(c.read(0).unwrap(), &[] as &[u8]);
        assert!(c.read_u8().is_err());
    }

    #[test]
    fn read_uint_both_orders() {
        let data = [0x01u8, 0x02, 0x03, 0x04];
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_uint(4, Endian::Little).unwrap(), 0x0403_0201);
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_uint(4, Endian::Big).unwrap(), 0x0102_0304);
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_uint(3, Endian::Big).unwrap(), 0x01_0203);
        assert_eq!(c.read_uint(1, Endian::Little).unwrap(), 0x04);
    }

    #[test]
    fn read_u32_truncated() {
        let data = [0xffu8; 3];
        let mut c = ByteCursor::new(&data);
        assert!(matches!(
            c.read_u32(Endian::Little),
            Err(CodecError::TruncatedInput { needed: 4, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "not in 1..=8")]
    fn read_uint_rejects_wide() {
        let data = [0u8; 16];
        let _ = ByteCursor::new(&data).read_uint(9, Endian::Little);
    }

    #[test]
    fn slices_outlive_cursor() {
        let data = vec![9u8, 8, 7];
        let slice = {
            let mut c = ByteCursor::new(&data);
            c.read(2).unwrap()
        };
        assert_eq!(slice, &[9, 8]);
    }

    #[test]
    fn writer_matches_reader() {
        let mut out = Vec::new();
        let mut w = ByteWriter::new(&mut out);
        w.write_u8(0x81);
        w.write_u32(0x0102_0304, Endian::Little);
        w.write_u32(0x0102_0304, Endian::Big);
        w.write_uint(0xabcd, 2, Endian::Big);
        w.write_zeros(2);
        assert_eq!(w.len(), 13);
        assert_eq!(
            out,
            [0x81, 4, 3, 2, 1, 1, 2, 3, 4, 0xab, 0xcd, 0, 0]
        );

        let mut c = ByteCursor::new(&out);
        assert_eq!(c.read_u8().unwrap(), 0x81);
        assert_eq!(c.read_u32(Endian::Little).unwrap(), 0x0102_0304);
        assert_eq!(c.read_u32(Endian::Big).unwrap(), 0x0102_0304);
        assert_eq!(c.read_uint(2, Endian::Big).unwrap(), 0xabcd);
        assert_eq!(c.remaining(), 2);
    }
}
