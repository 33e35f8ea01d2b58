//! Scroll-region row copies.

use super::error::GridError;

/// A rectangular scroll region, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRegion {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl ScrollRegion {
    pub const fn new(top: usize, bottom: usize, left: usize, right: usize) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }

    pub(crate) fn validate(&self, rows: usize, cols: usize) -> Result<(), GridError> {
        if self.top >= self.bottom || self.bottom > rows || self.left >= self.right || self.right > cols {
            return Err(GridError::InvalidRegion {
                top: self.top,
                bottom: self.bottom,
                left: self.left,
                right: self.right,
                rows,
                cols,
            });
        }
        Ok(())
    }

    /// `(dst, src)` row pairs for a shift by `rows`, in an order that never
    /// reads a row after it was overwritten.
    ///
    /// Positive `rows` moves content up and copies top-down; negative moves
    /// it down and copies bottom-up. A shift of the full height or more
    /// copies nothing.
    pub fn row_copies(&self, rows: isize) -> Vec<(usize, usize)> {
        let shift = rows.unsigned_abs();
        if shift == 0 || shift >= self.height() {
            return Vec::new();
        }
        if rows > 0 {
            (self.top..self.bottom - shift).map(|dst| (dst, dst + shift)).collect()
        } else {
            (self.top + shift..self.bottom)
                .rev()
                .map(|dst| (dst, dst - shift))
                .collect()
        }
    }
}
