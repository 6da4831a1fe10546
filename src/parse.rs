//! Record parsing.
//!
//! [`RecordParser`] decodes one record at the cursor. [`RecordReader`]
//! walks a whole buffer record by record and tracks where it is in the
//! per-record state machine:
//!
//! ```text
//! AwaitingRecord → ParsingHeader → ParsingPayload → RecordComplete ─┐
//!       ↑                                                           │
//!       └──────────────────── more bytes ───────────────────────────┤
//!                                                   at end → Done ──┘
//! ```

use alloc::borrow::Cow;

use crate::cursor::{ByteCursor, Endian};
use crate::error::CodecError;
use crate::format::{PACKED_HEADER_LEN, PixelFormat, RecordTag, VariantKind};
use crate::limits::ResourceLimits;
use crate::record::{ImageRecord, Variant};

/// Parsed and validated record header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    /// Input offset of the tag byte.
    pub offset: usize,
    /// Pixel format named by the tag.
    pub format: PixelFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed, or strided with the header's stride.
    pub variant: Variant,
}

impl RecordHeader {
    /// Header length on the wire.
    pub fn header_len(&self) -> usize {
        RecordTag::new(self.format, self.variant.kind()).header_len()
    }

    /// Payload length: `width × height × bpp` when packed,
    /// `stride × height` when strided.
    pub fn payload_len(&self) -> usize {
        // validated against overflow in `RecordParser::parse_header`
        self.pitch() * self.height as usize
    }

    /// Whole record length, header plus payload.
    pub fn record_len(&self) -> usize {
        self.header_len() + self.payload_len()
    }

    fn pitch(&self) -> usize {
        match self.variant {
            Variant::Packed => self.width as usize * self.format.bytes_per_pixel(),
            Variant::Strided { stride } => stride as usize,
        }
    }
}

/// Decodes records from a [`ByteCursor`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordParser {
    byte_order: Endian,
    limits: ResourceLimits,
}

impl RecordParser {
    /// Parser for little-endian headers with no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte order of header fields.
    pub fn with_byte_order(mut self, byte_order: Endian) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set resource limits checked against each header.
    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Decode one record and leave the cursor exactly at its end.
    ///
    /// On error the cursor position is unspecified; callers abort.
    pub fn parse<'a>(&self, cursor: &mut ByteCursor<'a>) -> Result<ImageRecord<'a>, CodecError> {
        let header = self.parse_header(cursor)?;
        self.parse_payload(cursor, &header)
    }

    /// Read and validate the fixed-size header.
    pub fn parse_header(&self, cursor: &mut ByteCursor<'_>) -> Result<RecordHeader, CodecError> {
        let offset = cursor.position();
        let tag_byte = cursor.read_u8()?;
        let tag = RecordTag::from_byte(tag_byte).ok_or(CodecError::UnknownFormatTag {
            offset,
            tag: tag_byte,
        })?;
        let width = cursor.read_u32(self.byte_order)?;
        let height = cursor.read_u32(self.byte_order)?;
        let stride = match tag.kind {
            VariantKind::Packed => None,
            VariantKind::Strided => Some(cursor.read_u32(self.byte_order)?),
        };

        let invalid = CodecError::InvalidDimensions {
            width,
            height,
            stride,
        };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let row_len = tag.format.row_bytes(width).ok_or(invalid.clone())?;
        let variant = match stride {
            None => Variant::Packed,
            Some(stride) if (stride as usize) < row_len => return Err(invalid),
            Some(stride) => Variant::Strided { stride },
        };
        let pitch = stride.map_or(row_len, |s| s as usize);
        pitch
            .checked_mul(height as usize)
            .and_then(|payload| payload.checked_add(tag.header_len()))
            .ok_or(invalid)?;

        self.limits.check_dimensions(width, height)?;

        Ok(RecordHeader {
            offset,
            format: tag.format,
            width,
            height,
            variant,
        })
    }

    /// Borrow the payload described by `header` from the cursor.
    pub fn parse_payload<'a>(
        &self,
        cursor: &mut ByteCursor<'a>,
        header: &RecordHeader,
    ) -> Result<ImageRecord<'a>, CodecError> {
        let payload = cursor.read(header.payload_len())?;
        Ok(ImageRecord::from_parts(
            Cow::Borrowed(payload),
            header.width,
            header.height,
            header.format,
            header.variant,
        ))
    }
}

/// Where a [`RecordReader`] stands in the per-record cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseState {
    /// At a record boundary, nothing read yet.
    AwaitingRecord,
    /// Reading the tag, dimensions, and stride.
    ParsingHeader,
    /// Header accepted; reading the payload.
    ParsingPayload,
    /// A record was just produced.
    RecordComplete,
    /// Input consumed exactly at a record boundary.
    Done,
    /// A record failed to parse; no further records are produced.
    Failed,
}

/// Iterator over the records of one input buffer.
///
/// Yields `Ok` for each record in input order, then `None` once the
/// buffer ends exactly at a record boundary. The first error is yielded
/// once and ends iteration.
#[derive(Clone, Debug)]
pub struct RecordReader<'a> {
    cursor: ByteCursor<'a>,
    parser: RecordParser,
    state: ParseState,
    count: u32,
}

impl<'a> RecordReader<'a> {
    /// Read records from `input` with the given parser settings.
    pub fn new(input: &'a [u8], parser: RecordParser) -> Self {
        Self {
            cursor: ByteCursor::new(input),
            parser,
            state: ParseState::AwaitingRecord,
            count: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Byte offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Records produced so far.
    pub fn records_read(&self) -> u32 {
        self.count
    }

    fn step(&mut self) -> Result<Option<ImageRecord<'a>>, CodecError> {
        if self.state == ParseState::RecordComplete {
            self.state = ParseState::AwaitingRecord;
        }
        if self.cursor.at_end() {
            self.state = ParseState::Done;
            return Ok(None);
        }
        let remaining = self.cursor.remaining();
        if remaining < PACKED_HEADER_LEN {
            return Err(CodecError::TrailingBytes {
                offset: self.cursor.position(),
                remaining,
            });
        }

        self.state = ParseState::ParsingHeader;
        let header = self.parser.parse_header(&mut self.cursor)?;
        self.parser.limits.check_records(self.count + 1)?;

        self.state = ParseState::ParsingPayload;
        let record = self.parser.parse_payload(&mut self.cursor, &header)?;

        self.count += 1;
        self.state = ParseState::RecordComplete;
        Ok(Some(record))
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = Result<ImageRecord<'a>, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, ParseState::Done | ParseState::Failed) {
            return None;
        }
        match self.step() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.state = ParseState::Failed;
                Some(Err(e))
            }
        }
    }
}

impl core::iter::FusedIterator for RecordReader<'_> {}
