//! Transcode configuration.

use crate::cursor::Endian;
use crate::encode::{PaddingPolicy, RecordEncoder};
use crate::format::VariantKind;
use crate::limits::ResourceLimits;
use crate::parse::RecordParser;
use crate::record::ImageRecord;
use crate::redeye::correct_red_eye;

/// Which variant each record is written as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TargetVariant {
    /// Keep each record's own variant.
    #[default]
    Preserve,
    /// Write every record packed.
    ForcePacked,
    /// Write every record strided. Packed records need
    /// [`TranscodeConfig::with_default_stride`].
    ForceStrided,
}

impl TargetVariant {
    /// Variant a record currently stored as `source` is written as.
    #[inline]
    pub const fn resolve(self, source: VariantKind) -> VariantKind {
        match self {
            Self::Preserve => source,
            Self::ForcePacked => VariantKind::Packed,
            Self::ForceStrided => VariantKind::Strided,
        }
    }
}

/// Pixel pass applied to each record between parsing and encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Normalization {
    /// Pixels pass through unchanged.
    #[default]
    None,
    /// Reduce the red channel of detected red-eye boxes in 8-bit
    /// RGB, RGBA and BGRA records.
    RedEyeCorrection,
}

impl Normalization {
    /// Run the pass on `record`.
    ///
    /// Records the pass leaves unchanged are returned as-is, still
    /// borrowing the input.
    pub fn apply<'a>(self, record: ImageRecord<'a>) -> ImageRecord<'a> {
        match self {
            Self::None => record,
            Self::RedEyeCorrection => correct_red_eye(&record).unwrap_or(record),
        }
    }
}

/// Settings for one transcode pass.
///
/// ```
/// use stridecodec::{TargetVariant, TranscodeConfig};
///
/// let config = TranscodeConfig::new()
///     .with_target(TargetVariant::ForceStrided)
///     .with_default_stride(64);
/// assert_eq!(config.default_stride, Some(64));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranscodeConfig {
    /// Output variant policy.
    pub target: TargetVariant,
    /// Stride for packed records written strided.
    pub default_stride: Option<u32>,
    /// Byte order of header fields, for both input and output.
    pub byte_order: Endian,
    /// Padding written into strided rows.
    pub padding: PaddingPolicy,
    /// Pixel pass run on every record.
    pub normalization: Normalization,
    /// Resource limits.
    pub limits: ResourceLimits,
}

impl TranscodeConfig {
    /// Default configuration: preserve variants, little-endian, no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output variant policy.
    pub fn with_target(mut self, target: TargetVariant) -> Self {
        self.target = target;
        self
    }

    /// Set the stride used when a packed record is written strided.
    pub fn with_default_stride(mut self, stride: u32) -> Self {
        self.default_stride = Some(stride);
        self
    }

    /// Set the header byte order.
    pub fn with_byte_order(mut self, byte_order: Endian) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set the padding policy.
    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }

    /// Set the normalization pass.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Set resource limits.
    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Parser configured from these settings.
    pub fn parser(&self) -> RecordParser {
        RecordParser::new()
            .with_byte_order(self.byte_order)
            .with_limits(self.limits)
    }

    /// Encoder configured from these settings.
    pub fn encoder(&self) -> RecordEncoder {
        let encoder = RecordEncoder::new()
            .with_byte_order(self.byte_order)
            .with_padding(self.padding);
        match self.default_stride {
            Some(stride) => encoder.with_default_stride(stride),
            None => encoder,
        }
    }
}
