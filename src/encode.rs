//! Record serialization.
//!
//! [`RecordEncoder`] writes a record in the same header shape the parser
//! reads, as either packed or strided rows.

use alloc::vec::Vec;

use crate::cursor::{ByteWriter, Endian};
use crate::error::CodecError;
use crate::format::{RecordTag, VariantKind};
use crate::record::{ImageRecord, Variant};

/// What to write into the padding of strided rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaddingPolicy {
    /// Copy the source padding when the record keeps its own stride;
    /// zero-fill otherwise.
    #[default]
    Preserve,
    /// Always zero-fill.
    Zero,
}

/// Serializes [`ImageRecord`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordEncoder {
    byte_order: Endian,
    padding: PaddingPolicy,
    default_stride: Option<u32>,
}

impl RecordEncoder {
    /// Encoder for little-endian headers, preserved padding, and no
    /// default stride.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte order of header fields.
    pub fn with_byte_order(mut self, byte_order: Endian) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set the padding policy for strided output.
    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }

    /// Stride used when a packed record must be written strided.
    pub fn with_default_stride(mut self, stride: u32) -> Self {
        self.default_stride = Some(stride);
        self
    }

    /// Stride that strided output of `record` would use.
    ///
    /// A strided record keeps its own stride; a packed one takes the
    /// configured default.
    pub fn output_stride(&self, record: &ImageRecord<'_>) -> Option<u32> {
        record.variant().stride().or(self.default_stride)
    }

    /// Exact encoded size of `record` written as `target`.
    pub fn encoded_len(
        &self,
        record: &ImageRecord<'_>,
        target: VariantKind,
    ) -> Result<usize, CodecError> {
        let pitch = match self.output_variant(record, target)? {
            Variant::Packed => record.row_len(),
            Variant::Strided { stride } => stride as usize,
        };
        Ok(RecordTag::new(record.format(), target).header_len() + pitch * record.height() as usize)
    }

    /// Serialize `record` as `target` into a new buffer.
    pub fn encode(
        &self,
        record: &ImageRecord<'_>,
        target: VariantKind,
    ) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(self.encoded_len(record, target)?);
        self.encode_into(record, target, &mut out)?;
        Ok(out)
    }

    /// Serialize `record` as `target`, appending to `out`.
    ///
    /// Returns the number of bytes appended. On error nothing is appended.
    pub fn encode_into(
        &self,
        record: &ImageRecord<'_>,
        target: VariantKind,
        out: &mut Vec<u8>,
    ) -> Result<usize, CodecError> {
        let layout = self.output_variant(record, target)?;
        let tag = RecordTag::new(record.format(), target);
        let mut w = ByteWriter::new(out);
        let start = w.len();

        w.write_u8(tag.to_byte());
        w.write_u32(record.width(), self.byte_order);
        w.write_u32(record.height(), self.byte_order);

        match layout {
            Variant::Packed => {
                for row in record.rows() {
                    w.write(row);
                }
            }
            Variant::Strided { stride } => {
                w.write_u32(stride, self.byte_order);
                let keeps_padding = self.padding == PaddingPolicy::Preserve
                    && record.variant() == Variant::Strided { stride };
                if keeps_padding {
                    w.write(record.payload());
                } else {
                    let pad = stride as usize - record.row_len();
                    for row in record.rows() {
                        w.write(row);
                        w.write_zeros(pad);
                    }
                }
            }
        }
        Ok(w.len() - start)
    }

    /// Variant, with stride, that `record` is written as for `target`.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnsupportedConversion`] when strided output has no
    /// stride to use, [`CodecError::InvalidDimensions`] when the stride is
    /// smaller than the row size.
    pub fn output_variant(
        &self,
        record: &ImageRecord<'_>,
        target: VariantKind,
    ) -> Result<Variant, CodecError> {
        match target {
            VariantKind::Packed => Ok(Variant::Packed),
            VariantKind::Strided => {
                let stride =
                    self.output_stride(record)
                        .ok_or(CodecError::UnsupportedConversion {
                            width: record.width(),
                            height: record.height(),
                        })?;
                let fits = (stride as usize) >= record.row_len()
                    && (stride as usize)
                        .checked_mul(record.height() as usize)
                        .is_some();
                if !fits {
                    return Err(CodecError::InvalidDimensions {
                        width: record.width(),
                        height: record.height(),
                        stride: Some(stride),
                    });
                }
                Ok(Variant::Strided { stride })
            }
        }
    }
}
