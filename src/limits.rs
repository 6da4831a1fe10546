//! Resource limits for transcoding.
//!
//! [`ResourceLimits`] defines caps on resource usage. [`LimitExceeded`]
//! is returned when a check fails. Dimension checks run right after a
//! record header is parsed, before the payload is touched.

/// Resource limits for a transcode pass.
///
/// Guards against hostile headers that claim huge dimensions and against
/// inputs with an unbounded number of records. All fields are optional;
/// `None` means no limit for that resource.
///
/// # Example
///
/// ```
/// use stridecodec::ResourceLimits;
///
/// let limits = ResourceLimits::none()
///     .with_max_pixels(100_000_000)
///     .with_max_records(4096);
/// assert!(limits.has_any());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct ResourceLimits {
    /// Maximum total pixels per record (width × height).
    pub max_pixels: Option<u64>,
    /// Maximum record width in pixels.
    pub max_width: Option<u32>,
    /// Maximum record height in pixels.
    pub max_height: Option<u32>,
    /// Maximum input buffer size in bytes.
    pub max_input_bytes: Option<u64>,
    /// Maximum transcoded output size in bytes.
    pub max_output_bytes: Option<u64>,
    /// Maximum number of records in one input buffer.
    pub max_records: Option<u32>,
}

impl ResourceLimits {
    /// No limits (all fields `None`).
    pub fn none() -> Self {
        Self::default()
    }

    /// Set maximum total pixels per record.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Set maximum record width in pixels.
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set maximum record height in pixels.
    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Set maximum input buffer size in bytes.
    pub fn with_max_input(mut self, bytes: u64) -> Self {
        self.max_input_bytes = Some(bytes);
        self
    }

    /// Set maximum output size in bytes.
    pub fn with_max_output(mut self, bytes: u64) -> Self {
        self.max_output_bytes = Some(bytes);
        self
    }

    /// Set maximum number of records.
    pub fn with_max_records(mut self, records: u32) -> Self {
        self.max_records = Some(records);
        self
    }

    /// Whether any limits are set.
    pub fn has_any(&self) -> bool {
        self.max_pixels.is_some()
            || self.max_width.is_some()
            || self.max_height.is_some()
            || self.max_input_bytes.is_some()
            || self.max_output_bytes.is_some()
            || self.max_records.is_some()
    }

    // --- Validation methods ---

    /// Check record dimensions against `max_width`, `max_height`, and `max_pixels`.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_width
            && width > max
        {
            return Err(LimitExceeded::Width { actual: width, max });
        }
        if let Some(max) = self.max_height
            && height > max
        {
            return Err(LimitExceeded::Height {
                actual: height,
                max,
            });
        }
        if let Some(max) = self.max_pixels {
            let pixels = width as u64 * height as u64;
            if pixels > max {
                return Err(LimitExceeded::Pixels {
                    actual: pixels,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Check input buffer size against `max_input_bytes`.
    pub fn check_input_size(&self, bytes: u64) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_input_bytes
            && bytes > max
        {
            return Err(LimitExceeded::InputSize { actual: bytes, max });
        }
        Ok(())
    }

    /// Check transcoded output size against `max_output_bytes`.
    pub fn check_output_size(&self, bytes: u64) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_output_bytes
            && bytes > max
        {
            return Err(LimitExceeded::OutputSize { actual: bytes, max });
        }
        Ok(())
    }

    /// Check a running record count against `max_records`.
    pub fn check_records(&self, count: u32) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_records
            && count > max
        {
            return Err(LimitExceeded::Records { actual: count, max });
        }
        Ok(())
    }
}

/// A resource limit was exceeded.
///
/// Each variant carries the actual value and the limit that was exceeded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LimitExceeded {
    /// Record width exceeded `max_width`.
    #[error("width {actual} exceeds limit {max}")]
    Width {
        /// Actual width.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Record height exceeded `max_height`.
    #[error("height {actual} exceeds limit {max}")]
    Height {
        /// Actual height.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Pixel count exceeded `max_pixels`.
    #[error("pixel count {actual} exceeds limit {max}")]
    Pixels {
        /// Actual pixel count.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// Input buffer exceeded `max_input_bytes`.
    #[error("input size {actual} bytes exceeds limit {max}")]
    InputSize {
        /// Actual input size in bytes.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// Output exceeded `max_output_bytes`.
    #[error("output size {actual} bytes exceeds limit {max}")]
    OutputSize {
        /// Actual output size in bytes.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// Record count exceeded `max_records`.
    #[error("record count {actual} exceeds limit {max}")]
    Records {
        /// Records seen so far.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn default_has_no_limits() {
        let limits = ResourceLimits::none();
        assert!(!limits.has_any());
        assert!(limits.check_dimensions(u32::MAX, u32::MAX).is_ok());
        assert!(limits.check_records(u32::MAX).is_ok());
    }

    #[test]
    fn builder_sets_limits() {
        let limits = ResourceLimits::none()
            .with_max_pixels(1_000_000)
            .with_max_output(4096);
        assert!(limits.has_any());
        assert_eq!(limits.max_pixels, Some(1_000_000));
        assert_eq!(limits.max_output_bytes, Some(4096));
        assert!(limits.max_input_bytes.is_none());
    }

    #[test]
    fn check_dimensions_pass() {
        let limits = ResourceLimits::none()
            .with_max_width(1920)
            .with_max_height(1080)
            .with_max_pixels(2_073_600);
        assert!(limits.check_dimensions(1920, 1080).is_ok());
    }

    #[test]
    fn check_dimensions_width() {
        let limits = ResourceLimits::none().with_max_width(100);
        assert_eq!(
            limits.check_dimensions(101, 1),
            Err(LimitExceeded::Width {
                actual: 101,
                max: 100
            })
        );
    }

    #[test]
    fn check_dimensions_height() {
        let limits = ResourceLimits::none().with_max_height(8);
        assert_eq!(
            limits.check_dimensions(1, 9),
            Err(LimitExceeded::Height { actual: 9, max: 8 })
        );
    }

    #[test]
    fn check_dimensions_pixels_no_overflow() {
        // u32::MAX squared must not wrap before comparison.
        let limits = ResourceLimits::none().with_max_pixels(u64::MAX - 1);
        assert!(limits.check_dimensions(u32::MAX, u32::MAX).is_ok());
        let limits = ResourceLimits::none().with_max_pixels(15);
        assert_eq!(
            limits.check_dimensions(4, 4),
            Err(LimitExceeded::Pixels {
                actual: 16,
                max: 15
            })
        );
    }

    #[test]
    fn check_sizes_and_records() {
        let limits = ResourceLimits::none()
            .with_max_input(10)
            .with_max_output(20)
            .with_max_records(2);
        assert!(limits.check_input_size(10).is_ok());
        assert!(limits.check_input_size(11).is_err());
        assert!(limits.check_output_size(20).is_ok());
        assert!(limits.check_output_size(21).is_err());
        assert!(limits.check_records(2).is_ok());
        assert_eq!(
            limits.check_records(3),
            Err(LimitExceeded::Records { actual: 3, max: 2 })
        );
    }

    #[test]
    fn display_messages() {
        let e = LimitExceeded::OutputSize { actual: 30, max: 20 };
        assert_eq!(e.to_string(), "output size 30 bytes exceeds limit 20");
    }
}
