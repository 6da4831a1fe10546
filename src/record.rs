//! The image record value shared by the parser, encoder, and normalizers.
//!
//! An [`ImageRecord`] is either packed (rows back-to-back) or strided
//! (rows at a fixed pitch with trailing padding). Both expose the same
//! row-level view, so downstream code never has to care which one it holds.

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::error::CodecError;
use crate::format::{PixelFormat, RecordTag, VariantKind};

/// Row storage of a record, with the stride when strided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Rows back-to-back; pitch equals the row size.
    Packed,
    /// Rows `stride` bytes apart; `stride - row size` padding bytes per row.
    Strided {
        /// Byte distance between row starts.
        stride: u32,
    },
}

impl Variant {
    /// The variant without its stride.
    #[inline]
    pub const fn kind(self) -> VariantKind {
        match self {
            Self::Packed => VariantKind::Packed,
            Self::Strided { .. } => VariantKind::Strided,
        }
    }

    /// Stride, if strided.
    #[inline]
    pub const fn stride(self) -> Option<u32> {
        match self {
            Self::Packed => None,
            Self::Strided { stride } => Some(stride),
        }
    }
}

/// One parsed image: dimensions, pixel format, and row storage.
///
/// Records are immutable. Parsing borrows the payload from the input
/// buffer; conversions and normalization passes return new records.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageRecord<'a> {
    data: Cow<'a, [u8]>,
    width: u32,
    height: u32,
    format: PixelFormat,
    variant: Variant,
}

impl<'a> ImageRecord<'a> {
    /// Assemble a record from an already-validated payload.
    ///
    /// Callers guarantee `width > 0`, `height > 0`, a stride of at least
    /// the row size, and `data.len() == pitch * height`.
    pub(crate) fn from_parts(
        data: Cow<'a, [u8]>,
        width: u32,
        height: u32,
        format: PixelFormat,
        variant: Variant,
    ) -> Self {
        let record = Self {
            data,
            width,
            height,
            format,
            variant,
        };
        debug_assert_eq!(
            Some(record.data.len()),
            record.stride().checked_mul(height as usize)
        );
        record
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per pixel.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Packed or strided, with the stride.
    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Tag this record would carry if written in its own variant.
    #[inline]
    pub fn tag(&self) -> RecordTag {
        RecordTag::new(self.format, self.variant.kind())
    }

    /// Pixel bytes per row, excluding padding.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Byte distance between row starts (the row size when packed).
    #[inline]
    pub fn stride(&self) -> usize {
        match self.variant {
            Variant::Packed => self.row_len(),
            Variant::Strided { stride } => stride as usize,
        }
    }

    /// Padding bytes after each row.
    #[inline]
    pub fn padding_len(&self) -> usize {
        self.stride() - self.row_len()
    }

    /// The raw payload as it sits on the wire, padding included.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    /// Payload length in bytes.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload still points into the parsed input.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Cow::Borrowed(_))
    }

    /// Pixel bytes for row `y` (no padding, exactly `width * bpp` bytes).
    pub fn row_bytes(&self, y: u32) -> Result<&[u8], CodecError> {
        let start = self.row_start(y)?;
        Ok(&self.data[start..start + self.row_len()])
    }

    /// Full stride bytes for row `y`, padding included.
    pub fn row_with_padding(&self, y: u32) -> Result<&[u8], CodecError> {
        let start = self.row_start(y)?;
        Ok(&self.data[start..start + self.stride()])
    }

    /// Iterate over the pixel bytes of every row, top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        let row_len = self.row_len();
        self.data
            .chunks_exact(self.stride())
            .map(move |row| &row[..row_len])
    }

    /// Copy into a new packed record, discarding padding.
    pub fn to_packed(&self) -> ImageRecord<'static> {
        let mut data = Vec::with_capacity(self.row_len() * self.height as usize);
        for row in self.rows() {
            data.extend_from_slice(row);
        }
        ImageRecord::from_parts(
            Cow::Owned(data),
            self.width,
            self.height,
            self.format,
            Variant::Packed,
        )
    }

    /// Copy into a new strided record with zero padding.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidDimensions`] if `stride` is smaller
    /// than the row size.
    pub fn to_strided(&self, stride: u32) -> Result<ImageRecord<'static>, CodecError> {
        let pitch = stride as usize;
        let row_len = self.row_len();
        if pitch < row_len {
            return Err(CodecError::InvalidDimensions {
                width: self.width,
                height: self.height,
                stride: Some(stride),
            });
        }
        let total = pitch
            .checked_mul(self.height as usize)
            .ok_or(CodecError::InvalidDimensions {
                width: self.width,
                height: self.height,
                stride: Some(stride),
            })?;
        let mut data = vec![0u8; total];
        for (dst, src) in data.chunks_exact_mut(pitch).zip(self.rows()) {
            dst[..row_len].copy_from_slice(src);
        }
        Ok(ImageRecord::from_parts(
            Cow::Owned(data),
            self.width,
            self.height,
            self.format,
            Variant::Strided { stride },
        ))
    }

    /// New record with the same shape and a replaced payload.
    pub(crate) fn with_payload(&self, data: Vec<u8>) -> ImageRecord<'static> {
        ImageRecord::from_parts(
            Cow::Owned(data),
            self.width,
            self.height,
            self.format,
            self.variant,
        )
    }

    /// Detach from the input buffer.
    pub fn into_owned(self) -> ImageRecord<'static> {
        ImageRecord {
            data: Cow::Owned(self.data.into_owned()),
            width: self.width,
            height: self.height,
            format: self.format,
            variant: self.variant,
        }
    }

    fn row_start(&self, y: u32) -> Result<usize, CodecError> {
        if y >= self.height {
            return Err(CodecError::IndexOutOfRange {
                index: y,
                len: self.height,
            });
        }
        Ok(y as usize * self.stride())
    }
}

impl fmt::Debug for ImageRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            Variant::Packed => write!(
                f,
                "ImageRecord({}x{}, {} packed)",
                self.width, self.height, self.format
            ),
            Variant::Strided { stride } => write!(
                f,
                "ImageRecord({}x{}, {} stride {stride})",
                self.width, self.height, self.format
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    fn packed_2x2() -> ImageRecord<'static> {
        ImageRecord::from_parts(
            Cow::Owned(vec![1, 2, 3, 4]),
            2,
            2,
            PixelFormat::GRAY8,
            Variant::Packed,
        )
    }

    fn strided_2x2(data: &[u8]) -> ImageRecord<'_> {
        ImageRecord::from_parts(
            Cow::Borrowed(data),
            2,
            2,
            PixelFormat::GRAY8,
            Variant::Strided { stride: 3 },
        )
    }

    #[test]
    fn packed_accessors() {
        let r = packed_2x2();
        assert_eq!(r.width(), 2);
        assert_eq!(r.height(), 2);
        assert_eq!(r.bytes_per_pixel(), 1);
        assert_eq!(r.variant(), Variant::Packed);
        assert_eq!(r.stride(), 2);
        assert_eq!(r.padding_len(), 0);
        assert_eq!(r.row_bytes(0).unwrap(), &[1, 2]);
        assert_eq!(r.row_bytes(1).unwrap(), &[3, 4]);
        assert!(!r.is_borrowed());
    }

    #[test]
    fn strided_rows_exclude_padding() {
        let data = [1u8, 2, 0xee, 3, 4, 0xff];
        let r = strided_2x2(&data);
        assert!(r.is_borrowed());
        assert_eq!(r.variant().stride(), Some(3));
        assert_eq!(r.padding_len(), 1);
        assert_eq!(r.row_bytes(1).unwrap(), &[3, 4]);
        assert_eq!(r.row_with_padding(1).unwrap(), &[3, 4, 0xff]);
        let rows: Vec<&[u8]> = r.rows().collect();
        assert_eq!(rows, [&[1u8, 2][..], &[3, 4][..]]);
    }

    #[test]
    fn row_out_of_range() {
        let r = packed_2x2();
        assert_eq!(
            r.row_bytes(2),
            Err(CodecError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(r.row_with_padding(7).is_err());
    }

    #[test]
    fn packed_to_strided_and_back() {
        let r = packed_2x2();
        let s = r.to_strided(3).unwrap();
        assert_eq!(s.payload(), &[1, 2, 0, 3, 4, 0]);
        assert_eq!(s.variant(), Variant::Strided { stride: 3 });
        let p = s.to_packed();
        assert_eq!(p, r);
    }

    #[test]
    fn padding_is_not_pixels() {
        let data = [1u8, 2, 0xee, 3, 4, 0xff];
        let p = strided_2x2(&data).to_packed();
        assert_eq!(p.payload(), &[1, 2, 3, 4]);
    }

    #[test]
    fn to_strided_rejects_small_stride() {
        let r = ImageRecord::from_parts(
            Cow::Owned(vec![0u8; 12]),
            2,
            2,
            PixelFormat::RGB8,
            Variant::Packed,
        );
        assert_eq!(
            r.to_strided(5),
            Err(CodecError::InvalidDimensions {
                width: 2,
                height: 2,
                stride: Some(5)
            })
        );
        assert!(r.to_strided(6).is_ok());
    }

    #[test]
    fn tag_follows_variant() {
        let data = [0u8; 6];
        assert_eq!(packed_2x2().tag().to_byte(), 0x01);
        assert_eq!(strided_2x2(&data).tag().to_byte(), 0x81);
    }

    #[test]
    fn into_owned_detaches() {
        let data = [1u8, 2, 0, 3, 4, 0];
        let owned = strided_2x2(&data).into_owned();
        assert!(!owned.is_borrowed());
        assert_eq!(owned.row_bytes(0).unwrap(), &[1, 2]);
    }

    #[test]
    fn debug_format() {
        let data = [0u8; 6];
        assert_eq!(
            format!("{:?}", packed_2x2()),
            "ImageRecord(2x2, Gray8 packed)"
        );
        assert_eq!(
            format!("{:?}", strided_2x2(&data)),
            "ImageRecord(2x2, Gray8 stride 3)"
        );
    }
}
