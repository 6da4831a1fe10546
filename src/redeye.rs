//! Red-eye correction.
//!
//! Finds 5×5 "eye" boxes drawn in saturated red and lowers the red channel
//! of every pixel that belongs to one. A box has a red top and bottom run
//! of three pixels, red left and right walls, and one of four inner
//! patterns:
//!
//! ```text
//!   pattern 1     pattern 2     pattern 3     pattern 4
//!   . r r r .     . r r r .     . r r r .     . r r r .
//!   r . . . r     r . x . r     r . x . r     r x . x r
//!   r x x x r     r . x . r     r x . x r     r . x . r
//!   r . . . r     r . x . r     r . x . r     r x . x r
//!   . r r r .     . r r r .     . r r r .     . r r r .
//! ```
//!
//! The whole 5×5 border and the `x` cells are corrected. Detection always
//! reads the original pixels, so overlapping boxes do not influence each
//! other, and each pixel is corrected at most once.

use alloc::vec;
use alloc::vec::Vec;

use rgb::FromSlice;

use crate::format::{ChannelLayout, ChannelType};
use crate::record::ImageRecord;

/// Red values at or above this count as part of an eye.
pub const RED_THRESHOLD: u8 = 200;
/// Amount subtracted from the red channel of corrected pixels.
pub const RED_REDUCTION: u8 = 150;

const EYE_SIZE: usize = 5;

/// 8-bit layouts with a red channel.
#[derive(Clone, Copy)]
enum RedLayout {
    Rgb,
    Rgba,
    Bgra,
}

impl RedLayout {
    fn of(record: &ImageRecord<'_>) -> Option<Self> {
        let format = record.format();
        if format.channel_type != ChannelType::U8 {
            return None;
        }
        match format.layout {
            ChannelLayout::Rgb => Some(Self::Rgb),
            ChannelLayout::Rgba => Some(Self::Rgba),
            ChannelLayout::Bgra => Some(Self::Bgra),
            ChannelLayout::Gray | ChannelLayout::GrayAlpha => None,
        }
    }

    fn push_reds(self, row: &[u8], reds: &mut Vec<u8>) {
        match self {
            Self::Rgb => reds.extend(row.as_rgb().iter().map(|p| p.r)),
            Self::Rgba => reds.extend(row.as_rgba().iter().map(|p| p.r)),
            Self::Bgra => reds.extend(row.as_bgra().iter().map(|p| p.r)),
        }
    }

    fn reduce(self, row: &mut [u8], x: usize) {
        let red = match self {
            Self::Rgb => &mut row.as_rgb_mut()[x].r,
            Self::Rgba => &mut row.as_rgba_mut()[x].r,
            Self::Bgra => &mut row.as_bgra_mut()[x].r,
        };
        *red = red.saturating_sub(RED_REDUCTION);
    }
}

/// Red channel of a record as a dense `width × height` grid.
struct RedPlane {
    reds: Vec<u8>,
    width: usize,
    height: usize,
}

impl RedPlane {
    fn is_red(&self, x: usize, y: usize) -> bool {
        self.reds[y * self.width + x] >= RED_THRESHOLD
    }

    /// Top-left corners of every eye box in the plane.
    fn find_eyes(&self) -> Vec<(usize, usize)> {
        let mut eyes = Vec::new();
        if self.width < EYE_SIZE || self.height < EYE_SIZE {
            return eyes;
        }
        for top in 0..=self.height - EYE_SIZE {
            for left in 0..=self.width - EYE_SIZE {
                if self.is_eye(left, top) {
                    eyes.push((left, top));
                }
            }
        }
        eyes
    }

    fn is_eye(&self, left: usize, top: usize) -> bool {
        let bottom = top + EYE_SIZE - 1;
        let right = left + EYE_SIZE - 1;
        (left + 1..right).all(|x| self.is_red(x, top) && self.is_red(x, bottom))
            && (top + 1..bottom).all(|y| self.is_red(left, y) && self.is_red(right, y))
    }

    /// Inner cells selected by the pattern, relative to the box's inner
    /// 3×3 origin.
    fn inner_pattern(&self, left: usize, top: usize) -> &'static [(usize, usize)] {
        let red = |dx: usize, dy: usize| self.is_red(left + 1 + dx, top + 1 + dy);
        if red(0, 0) {
            &[(0, 0), (2, 0), (1, 1), (0, 2), (2, 2)]
        } else if red(1, 0) {
            if red(0, 1) {
                &[(1, 0), (1, 1), (1, 2), (0, 1), (2, 1)]
            } else {
                &[(1, 0), (1, 1), (1, 2)]
            }
        } else if !red(2, 0) {
            &[(0, 1), (1, 1), (2, 1)]
        } else {
            &[]
        }
    }

    /// Mark every pixel belonging to the eye at `(left, top)`.
    fn mark_eye(&self, left: usize, top: usize, mask: &mut [bool]) {
        let mut mark = |x: usize, y: usize| mask[y * self.width + x] = true;
        let last = EYE_SIZE - 1;
        for d in 0..EYE_SIZE {
            mark(left + d, top);
            mark(left + d, top + last);
            mark(left, top + d);
            mark(left + last, top + d);
        }
        for &(dx, dy) in self.inner_pattern(left, top) {
            mark(left + 1 + dx, top + 1 + dy);
        }
    }
}

/// Correct every eye in `record`.
///
/// Returns `None` when the pixel format has no 8-bit red channel or no eye
/// was found, so the caller can keep the original (possibly borrowed)
/// record. Otherwise returns a new record with the same variant and
/// padding.
pub fn correct_red_eye(record: &ImageRecord<'_>) -> Option<ImageRecord<'static>> {
    let layout = RedLayout::of(record)?;
    let width = record.width() as usize;
    let height = record.height() as usize;

    let mut reds = Vec::with_capacity(width * height);
    for row in record.rows() {
        layout.push_reds(row, &mut reds);
    }
    let plane = RedPlane {
        reds,
        width,
        height,
    };

    let eyes = plane.find_eyes();
    if eyes.is_empty() {
        return None;
    }
    let mut mask = vec![false; width * height];
    for &(left, top) in &eyes {
        plane.mark_eye(left, top, &mut mask);
    }

    let mut data = record.payload().to_vec();
    let row_len = record.row_len();
    for (row, marks) in data
        .chunks_exact_mut(record.stride())
        .zip(mask.chunks_exact(width))
    {
        let pixels = &mut row[..row_len];
        for x in marks.iter().enumerate().filter(|(_, m)| **m).map(|(x, _)| x) {
            layout.reduce(pixels, x);
        }
    }
    Some(record.with_payload(data))
}
