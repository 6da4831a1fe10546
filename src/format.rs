//! Pixel formats and record tags.
//!
//! The first byte of every record is a tag that names both the pixel
//! format and whether rows are packed or strided:
//!
//! ```text
//!   bit   7      6 5     4 3          2 1 0
//!       strided  (zero)  channel type  channel layout
//! ```

use core::fmt;

// ---------------------------------------------------------------------------
// Descriptor enums
// ---------------------------------------------------------------------------

/// Channel storage type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelType {
    /// 8-bit unsigned integer (1 byte per channel).
    U8 = 0,
    /// 16-bit unsigned integer (2 bytes per channel).
    U16 = 1,
    /// 32-bit floating point (4 bytes per channel).
    F32 = 2,
}

impl ChannelType {
    /// Byte size of a single channel value.
    #[inline]
    pub const fn byte_size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::F32 => 4,
        }
    }

    const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::U8),
            1 => Some(Self::U16),
            2 => Some(Self::F32),
            _ => None,
        }
    }
}

/// Channel layout (number and meaning of channels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelLayout {
    /// Single luminance channel.
    Gray = 1,
    /// Luminance + alpha.
    GrayAlpha = 2,
    /// Red, green, blue.
    Rgb = 3,
    /// Red, green, blue, alpha.
    Rgba = 4,
    /// Blue, green, red, alpha.
    Bgra = 5,
}

impl ChannelLayout {
    /// Number of channels in this layout.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba | Self::Bgra => 4,
        }
    }

    /// Whether this layout includes an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::GrayAlpha | Self::Rgba | Self::Bgra)
    }

    const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Gray),
            2 => Some(Self::GrayAlpha),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            5 => Some(Self::Bgra),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// PixelFormat
// ---------------------------------------------------------------------------

/// Pixel format of a record: channel storage plus channel layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    /// Channel storage type.
    pub channel_type: ChannelType,
    /// Channel layout.
    pub layout: ChannelLayout,
}

impl PixelFormat {
    /// Create a pixel format.
    pub const fn new(channel_type: ChannelType, layout: ChannelLayout) -> Self {
        Self {
            channel_type,
            layout,
        }
    }

    /// 8-bit grayscale.
    pub const GRAY8: Self = Self::new(ChannelType::U8, ChannelLayout::Gray);
    /// 8-bit grayscale with alpha.
    pub const GRAYA8: Self = Self::new(ChannelType::U8, ChannelLayout::GrayAlpha);
    /// 8-bit RGB.
    pub const RGB8: Self = Self::new(ChannelType::U8, ChannelLayout::Rgb);
    /// 8-bit RGBA.
    pub const RGBA8: Self = Self::new(ChannelType::U8, ChannelLayout::Rgba);
    /// 8-bit BGRA.
    pub const BGRA8: Self = Self::new(ChannelType::U8, ChannelLayout::Bgra);
    /// 16-bit grayscale.
    pub const GRAY16: Self = Self::new(ChannelType::U16, ChannelLayout::Gray);
    /// 16-bit RGBA.
    pub const RGBA16: Self = Self::new(ChannelType::U16, ChannelLayout::Rgba);

    /// Bytes per pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        self.channel_type.byte_size() * self.layout.channels()
    }

    /// Number of channels.
    #[inline]
    pub const fn channels(self) -> u8 {
        self.layout.channels() as u8
    }

    /// Whether this format has an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        self.layout.has_alpha()
    }

    /// Byte length of one row of `width` pixels, or `None` on overflow.
    #[inline]
    pub const fn row_bytes(self, width: u32) -> Option<usize> {
        (width as usize).checked_mul(self.bytes_per_pixel())
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = match self.layout {
            ChannelLayout::Gray => "Gray",
            ChannelLayout::GrayAlpha => "GrayAlpha",
            ChannelLayout::Rgb => "Rgb",
            ChannelLayout::Rgba => "Rgba",
            ChannelLayout::Bgra => "Bgra",
        };
        let depth = match self.channel_type {
            ChannelType::U8 => "8",
            ChannelType::U16 => "16",
            ChannelType::F32 => "F32",
        };
        write!(f, "{layout}{depth}")
    }
}

// ---------------------------------------------------------------------------
// RecordTag
// ---------------------------------------------------------------------------

/// Row storage scheme, without the stride value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// Rows back-to-back with no padding.
    Packed,
    /// Rows at a fixed pitch, possibly followed by padding.
    Strided,
}

/// Decoded record tag byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordTag {
    /// Pixel format of the record.
    pub format: PixelFormat,
    /// Whether the header carries a stride field.
    pub kind: VariantKind,
}

const STRIDED_BIT: u8 = 0x80;
const RESERVED_BITS: u8 = 0x60;
const TYPE_SHIFT: u8 = 3;
const TYPE_MASK: u8 = 0x03;
const LAYOUT_MASK: u8 = 0x07;

impl RecordTag {
    /// Create a tag.
    pub const fn new(format: PixelFormat, kind: VariantKind) -> Self {
        Self { format, kind }
    }

    /// Decode a tag byte. Returns `None` for unknown layouts, unknown
    /// channel types, or reserved bits set.
    pub const fn from_byte(tag: u8) -> Option<Self> {
        if tag & RESERVED_BITS != 0 {
            return None;
        }
        let Some(layout) = ChannelLayout::from_code(tag & LAYOUT_MASK) else {
            return None;
        };
        let Some(channel_type) = ChannelType::from_code((tag >> TYPE_SHIFT) & TYPE_MASK) else {
            return None;
        };
        let kind = if tag & STRIDED_BIT != 0 {
            VariantKind::Strided
        } else {
            VariantKind::Packed
        };
        Some(Self {
            format: PixelFormat::new(channel_type, layout),
            kind,
        })
    }

    /// Encode this tag as its wire byte.
    pub const fn to_byte(self) -> u8 {
        let strided = match self.kind {
            VariantKind::Packed => 0,
            VariantKind::Strided => STRIDED_BIT,
        };
        strided | ((self.format.channel_type as u8) << TYPE_SHIFT) | self.format.layout as u8
    }

    /// Header size in bytes for this tag: tag, width, height, and the
    /// stride field when strided.
    pub const fn header_len(self) -> usize {
        match self.kind {
            VariantKind::Packed => PACKED_HEADER_LEN,
            VariantKind::Strided => STRIDED_HEADER_LEN,
        }
    }
}

/// Header size of a packed record.
pub const PACKED_HEADER_LEN: usize = 1 + 4 + 4;
/// Header size of a strided record.
pub const STRIDED_HEADER_LEN: usize = PACKED_HEADER_LEN + 4;
