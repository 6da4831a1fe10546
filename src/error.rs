//! Codec error type.

use crate::limits::LimitExceeded;

/// Errors from parsing, encoding, or transcoding image records.
///
/// Any error aborts the whole transcode; no partial output is produced.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// A fixed-size read ran past the end of the buffer.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        /// Cursor position where the read started.
        offset: usize,
        /// Bytes the read needed.
        needed: usize,
        /// Bytes that were left.
        available: usize,
    },

    /// Zero width or height, a stride below the row size, or a size that
    /// overflows.
    #[error("invalid dimensions {width}x{height}{}", fmt_stride(.stride))]
    InvalidDimensions {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Stride in bytes, if the record carried or requested one.
        stride: Option<u32>,
    },

    /// The record tag byte does not name a known layout.
    #[error("unknown format tag 0x{tag:02x} at offset {offset}")]
    UnknownFormatTag {
        /// Position of the tag byte.
        offset: usize,
        /// The tag value.
        tag: u8,
    },

    /// The buffer ends between record boundaries.
    #[error("{remaining} trailing bytes at offset {offset} do not form a record")]
    TrailingBytes {
        /// Position where the incomplete record starts.
        offset: usize,
        /// Bytes left at that position.
        remaining: usize,
    },

    /// Strided output was requested but no stride is available.
    #[error("cannot write {width}x{height} record as strided: no stride available")]
    UnsupportedConversion {
        /// Width in pixels of the record that could not be converted.
        width: u32,
        /// Height in pixels of the record that could not be converted.
        height: u32,
    },

    /// Row accessor called outside `0..height`.
    #[error("row index {index} out of range (rows: {len})")]
    IndexOutOfRange {
        /// Requested row.
        index: u32,
        /// Number of rows in the record.
        len: u32,
    },

    /// A configured resource limit was exceeded.
    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),
}

fn fmt_stride(stride: &Option<u32>) -> StrideSuffix {
    StrideSuffix(*stride)
}

struct StrideSuffix(Option<u32>);

impl core::fmt::Display for StrideSuffix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(stride) => write!(f, " with stride {stride}"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_truncated() {
        let e = CodecError::TruncatedInput {
            offset: 9,
            needed: 4,
            available: 1,
        };
        assert_eq!(
            e.to_string(),
            "truncated input at offset 9: needed 4 bytes, 1 available"
        );
    }

    #[test]
    fn display_tag_is_hex() {
        let e = CodecError::UnknownFormatTag { offset: 0, tag: 0x7f };
        assert_eq!(e.to_string(), "unknown format tag 0x7f at offset 0");
    }

    #[test]
    fn display_dimensions_with_and_without_stride() {
        let with = CodecError::InvalidDimensions {
            width: 4,
            height: 2,
            stride: Some(3),
        };
        assert_eq!(with.to_string(), "invalid dimensions 4x2 with stride 3");
        let without = CodecError::InvalidDimensions {
            width: 0,
            height: 2,
            stride: None,
        };
        assert_eq!(without.to_string(), "invalid dimensions 0x2");
    }

    #[test]
    fn limit_error_converts_transparently() {
        let limit = LimitExceeded::Records { actual: 3, max: 2 };
        let e: CodecError = limit.clone().into();
        assert_eq!(e, CodecError::LimitExceeded(limit.clone()));
        assert_eq!(e.to_string(), limit.to_string());
    }
}
