//! Whole-buffer transcoding.
//!
//! [`Transcoder`] walks an input buffer record by record, runs the
//! configured normalization, and re-encodes each record under the target
//! variant policy. The output is all-or-nothing: any error aborts the pass
//! and no partial buffer is returned.

use alloc::vec::Vec;

use crate::config::TranscodeConfig;
use crate::error::CodecError;
use crate::parse::RecordReader;
use crate::record::{ImageRecord, Variant};

/// Where one record sat in the input and where it landed in the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordSpan {
    /// Byte offset of the record in the input.
    pub input_offset: usize,
    /// Encoded length of the record in the input.
    pub input_len: usize,
    /// Byte offset of the record in the output.
    pub output_offset: usize,
    /// Encoded length of the record in the output.
    pub output_len: usize,
    /// Variant the record was read as.
    pub source: Variant,
    /// Variant the record was written as.
    pub target: Variant,
}

/// Output of a transcode pass: the encoded bytes plus one span per record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranscodeOutput {
    data: Vec<u8>,
    spans: Vec<RecordSpan>,
}

impl TranscodeOutput {
    /// Consume and return the encoded bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Borrow the encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Encoded byte count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the output is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Per-record spans in input order.
    pub fn spans(&self) -> &[RecordSpan] {
        &self.spans
    }

    /// Number of records transcoded.
    pub fn record_count(&self) -> usize {
        self.spans.len()
    }
}

impl AsRef<[u8]> for TranscodeOutput {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// A parsed record with its input span.
struct Parsed<'a> {
    input_offset: usize,
    input_len: usize,
    record: ImageRecord<'a>,
}

/// Re-encodes a buffer of records under one [`TranscodeConfig`].
///
/// ```
/// use stridecodec::{TargetVariant, TranscodeConfig, Transcoder};
///
/// let input = [0x01, 2, 0, 0, 0, 2, 0, 0, 0, 1, 2, 3, 4];
/// let config = TranscodeConfig::new()
///     .with_target(TargetVariant::ForceStrided)
///     .with_default_stride(3);
/// let output = Transcoder::new(config).transcode(&input)?;
/// assert_eq!(&output.bytes()[13..], &[1, 2, 0, 3, 4, 0]);
/// # Ok::<(), stridecodec::CodecError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Transcoder {
    config: TranscodeConfig,
}

impl Transcoder {
    /// Transcoder for `config`.
    pub fn new(config: TranscodeConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &TranscodeConfig {
        &self.config
    }

    /// Transcode every record in `input`.
    ///
    /// An empty input yields an empty output. With the `rayon` feature,
    /// records are located sequentially and then normalized and encoded
    /// in parallel; the output is identical either way.
    ///
    /// # Errors
    ///
    /// The first parse, encode, or limit error aborts the pass.
    pub fn transcode(&self, input: &[u8]) -> Result<TranscodeOutput, CodecError> {
        self.config.limits.check_input_size(input.len() as u64)?;
        #[cfg(feature = "rayon")]
        {
            self.transcode_parallel(input)
        }
        #[cfg(not(feature = "rayon"))]
        {
            self.transcode_sequential(input)
        }
    }

    fn records<'a>(
        &self,
        input: &'a [u8],
    ) -> impl Iterator<Item = Result<Parsed<'a>, CodecError>> {
        let mut reader = RecordReader::new(input, self.config.parser());
        core::iter::from_fn(move || {
            let input_offset = reader.position();
            let record = reader.next()?;
            Some(record.map(|record| Parsed {
                input_offset,
                input_len: reader.position() - input_offset,
                record,
            }))
        })
    }

    /// Output size of `record` under the target policy. Normalization
    /// never changes a record's shape, so this holds before and after it.
    fn encoded_len(&self, record: &ImageRecord<'_>) -> Result<usize, CodecError> {
        let encoder = self.config.encoder();
        let target = self.config.target.resolve(record.variant().kind());
        let target = encoder.output_variant(record, target)?;
        encoder.encoded_len(record, target.kind())
    }

    /// Normalize and encode one record, appending to `out`.
    ///
    /// The output limit is checked against `out.len()` plus the record's
    /// encoded size before anything is written or reserved.
    fn encode_record(&self, parsed: Parsed<'_>, out: &mut Vec<u8>) -> Result<RecordSpan, CodecError> {
        let encoder = self.config.encoder();
        let record = self.config.normalization.apply(parsed.record);
        let source = record.variant();
        let target = self.config.target.resolve(source.kind());
        let target = encoder.output_variant(&record, target)?;
        let needed = self.encoded_len(&record)?;
        let output_offset = out.len();
        let total = (output_offset as u64).saturating_add(needed as u64);
        self.config.limits.check_output_size(total)?;
        out.reserve(needed);
        let output_len = encoder.encode_into(&record, target.kind(), out)?;
        Ok(RecordSpan {
            input_offset: parsed.input_offset,
            input_len: parsed.input_len,
            output_offset,
            output_len,
            source,
            target,
        })
    }

    #[cfg_attr(feature = "rayon", allow(dead_code))]
    fn transcode_sequential(&self, input: &[u8]) -> Result<TranscodeOutput, CodecError> {
        let mut data = Vec::with_capacity(input.len());
        let mut spans = Vec::new();
        for parsed in self.records(input) {
            spans.push(self.encode_record(parsed?, &mut data)?);
        }
        Ok(TranscodeOutput { data, spans })
    }

    #[cfg(feature = "rayon")]
    fn transcode_parallel(&self, input: &[u8]) -> Result<TranscodeOutput, CodecError> {
        use rayon::prelude::*;

        let parsed = self.records(input).collect::<Result<Vec<_>, _>>()?;
        let mut total = 0u64;
        for p in &parsed {
            total = total.saturating_add(self.encoded_len(&p.record)? as u64);
            self.config.limits.check_output_size(total)?;
        }

        let encoded = parsed
            .into_par_iter()
            .map(|parsed| {
                let mut bytes = Vec::new();
                self.encode_record(parsed, &mut bytes).map(|span| (span, bytes))
            })
            .collect::<Result<Vec<_>, CodecError>>()?;

        let total = total as usize;
        let mut data = Vec::with_capacity(total);
        let mut spans = Vec::with_capacity(encoded.len());
        for (mut span, bytes) in encoded {
            span.output_offset = data.len();
            data.extend_from_slice(&bytes);
            spans.push(span);
        }
        Ok(TranscodeOutput { data, spans })
    }
}

/// Transcode `input` under `config` and return the encoded bytes.
///
/// Shorthand for `Transcoder::new(*config).transcode(input)` that drops
/// the per-record report.
pub fn transcode(input: &[u8], config: &TranscodeConfig) -> Result<Vec<u8>, CodecError> {
    Transcoder::new(*config)
        .transcode(input)
        .map(TranscodeOutput::into_vec)
}
