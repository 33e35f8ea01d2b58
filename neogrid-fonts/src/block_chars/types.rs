//! Shared types for procedural block character rendering.

use crate::rasterizer::Canvas;

/// Unicode ranges drawn procedurally
pub mod ranges {
    /// Box Drawing characters (U+2500–U+257F)
    pub const BOX_DRAWING_START: u32 = 0x2500;
    pub const BOX_DRAWING_END: u32 = 0x257F;

    /// Block Elements (U+2580–U+259F)
    pub const BLOCK_ELEMENTS_START: u32 = 0x2580;
    pub const BLOCK_ELEMENTS_END: u32 = 0x259F;
}

/// Classification of procedurally drawn characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCharType {
    /// Not a block character - render from the font
    None,
    /// Box drawing lines (─, │, ┌, ┐, etc.)
    BoxDrawing,
    /// Full block (█)
    SolidBlock,
    /// Partial block elements (▌, ▐, ▖, eighths, etc.)
    PartialBlock,
    /// Shade characters (░, ▒, ▓)
    Shade,
}

/// A rectangle in normalized cell coordinates (0.0 = top/left, 1.0 = bottom/right)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricBlock {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl GeometricBlock {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Full cell block
    pub const fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Convert to pixel coordinates for a cell of `cell_w × cell_h`
    pub fn to_pixel_rect(self, cell_w: f32, cell_h: f32) -> PixelRect {
        PixelRect {
            x: self.x * cell_w,
            y: self.y * cell_h,
            width: self.width * cell_w,
            height: self.height * cell_h,
        }
    }
}

/// Pixel rectangle inside a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    /// Snap edges to the pixel grid.
    ///
    /// Edges are rounded independently so that two blocks sharing an edge
    /// (e.g. ▀ above ▄) meet exactly with no gap or overlap. A non-empty rect
    /// keeps at least one pixel in each direction.
    pub fn snap_to_pixels(self) -> Self {
        let x0 = self.x.round();
        let y0 = self.y.round();
        let mut x1 = (self.x + self.width).round();
        let mut y1 = (self.y + self.height).round();
        if self.width > 0.0 && x1 <= x0 {
            x1 = x0 + 1.0;
        }
        if self.height > 0.0 && y1 <= y0 {
            y1 = y0 + 1.0;
        }
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Fill this rect on `canvas` with `value` coverage.
    pub fn fill(self, canvas: &mut Canvas, value: u8) {
        let x0 = self.x as i32;
        let y0 = self.y as i32;
        canvas.fill_rect(
            x0,
            y0,
            x0 + self.width as i32,
            y0 + self.height as i32,
            value,
        );
    }
}

/// Block geometry plus the uniform coverage it is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGeometry {
    pub segments: Vec<GeometricBlock>,
    /// 255 for solid blocks; 25/50/75% for shades
    pub alpha: u8,
}

impl BlockGeometry {
    pub fn solid(segments: Vec<GeometricBlock>) -> Self {
        Self {
            segments,
            alpha: 255,
        }
    }
}
