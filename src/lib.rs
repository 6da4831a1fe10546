//! Lossless transcoder for packed and strided raw image records.
//!
//! An input buffer holds zero or more back-to-back records, each a small
//! header (format tag, width, height, and a stride when strided) followed
//! by pixel rows. This crate parses those records without copying and
//! re-encodes them under a target-variant policy:
//!
//! - [`ByteCursor`] / [`ByteWriter`] — bounds-checked byte reading and writing
//! - [`ImageRecord`] — one parsed image, packed or strided, with row access
//! - [`RecordParser`] / [`RecordReader`] — header validation and record iteration
//! - [`RecordEncoder`] — serialization as packed or strided rows
//! - [`Transcoder`] / [`transcode`] — the whole-buffer pass
//! - [`TranscodeConfig`] — target variant, default stride, byte order,
//!   padding, normalization, and [`ResourceLimits`]
//!
//! Every error aborts the pass; a failed transcode never returns partial
//! output.
//!
//! ```
//! use stridecodec::{transcode, TranscodeConfig};
//!
//! let input = [0x01, 2, 0, 0, 0, 2, 0, 0, 0, 1, 2, 3, 4];
//! let output = transcode(&input, &TranscodeConfig::new())?;
//! assert_eq!(output, input);
//! # Ok::<(), stridecodec::CodecError>(())
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod config;
mod cursor;
mod encode;
mod error;
mod format;
mod limits;
mod parse;
mod record;
mod redeye;
mod transcode;

pub use config::{Normalization, TargetVariant, TranscodeConfig};
pub use cursor::{ByteCursor, ByteWriter, Endian};
pub use encode::{PaddingPolicy, RecordEncoder};
pub use error::CodecError;
pub use format::{
    ChannelLayout, ChannelType, PACKED_HEADER_LEN, PixelFormat, RecordTag, STRIDED_HEADER_LEN,
    VariantKind,
};
pub use limits::{LimitExceeded, ResourceLimits};
pub use parse::{ParseState, RecordHeader, RecordParser, RecordReader};
pub use record::{ImageRecord, Variant};
pub use redeye::{RED_REDUCTION, RED_THRESHOLD, correct_red_eye};
pub use transcode::{RecordSpan, TranscodeOutput, Transcoder, transcode};

// Pixel types used by the normalization passes.
pub use rgb;
