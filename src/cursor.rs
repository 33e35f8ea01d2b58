//! Cursor drawn into one reserved vertex record.

use neogrid_fonts::GlyphRasterizer;
use neogrid_render::{AtlasRect, GlyphContext, ReservedRange, VertexStream};

use crate::grid::CellGrid;
use crate::redraw::CursorShape;

const HIDDEN: [f32; 4] = [0.0; 4];

pub struct CursorOverlay {
    range: ReservedRange,
    row: usize,
    col: usize,
    shape: CursorShape,
    dirty: bool,
}

impl CursorOverlay {
    pub fn new(stream: &mut VertexStream) -> Self {
        Self {
            range: stream.reserve(1),
            row: 0,
            col: 0,
            shape: CursorShape::Block,
            dirty: true,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn shape(&self) -> CursorShape {
        self.shape
    }

    pub fn range(&self) -> ReservedRange {
        self.range
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn move_to(&mut self, row: usize, col: usize) {
        if (row, col) != (self.row, self.col) {
            self.row = row;
            self.col = col;
            self.dirty = true;
        }
    }

    pub fn set_shape(&mut self, shape: CursorShape) {
        if shape != self.shape {
            self.shape = shape;
            self.dirty = true;
        }
    }

    /// Rewrite the overlay record from the cell under the cursor.
    ///
    /// A block inverts the cell: its background takes the cell foreground
    /// and the glyph is tinted with the cell background. Bars are solid
    /// rectangles in the cell foreground.
    pub fn redraw<R: GlyphRasterizer>(
        &mut self,
        stream: &mut VertexStream,
        grid: &CellGrid,
        ctx: &mut GlyphContext<R>,
    ) {
        self.dirty = false;
        let draw = match grid.cell_draw(self.row, self.col) {
            Some(draw) => draw,
            None => {
                stream.overlay(self.range).clear(0);
                return;
            }
        };

        let cell = stream.cell_size();
        let (w, h) = (cell.width as f32, cell.height as f32);
        let (x, y) = (self.col as f32 * w, self.row as f32 * h);
        let wide = stream.is_wide(self.row, self.col);

        match self.shape {
            CursorShape::Block => {
                let glyph = draw
                    .glyph_key()
                    .and_then(|key| ctx.resolve(key))
                    .map(|rect| {
                        if wide || rect.width <= cell.width {
                            rect
                        } else {
                            // Clipped in the last column, like the cell itself.
                            AtlasRect::new(rect.x, rect.y, cell.width, rect.height)
                        }
                    });
                let width = if wide { w * 2.0 } else { w };
                let mut overlay = stream.overlay(self.range);
                overlay.set_position(0, [x, y, width, h]);
                overlay.set_primary_tex(0, glyph);
                overlay.set_secondary_tex(0, None);
                overlay.set_colors(0, draw.bg, draw.fg, HIDDEN);
            }
            CursorShape::Vertical { percentage } => {
                let bar = (w * f32::from(percentage.min(100)) / 100.0).round().max(1.0);
                let mut overlay = stream.overlay(self.range);
                overlay.set_position(0, [x, y, bar, h]);
                overlay.set_primary_tex(0, None);
                overlay.set_secondary_tex(0, None);
                overlay.set_colors(0, draw.fg, draw.fg, HIDDEN);
            }
            CursorShape::Horizontal { percentage } => {
                let bar = (h * f32::from(percentage.min(100)) / 100.0).round().max(1.0);
                let mut overlay = stream.overlay(self.range);
                overlay.set_position(0, [x, y + h - bar, w, bar]);
                overlay.set_primary_tex(0, None);
                overlay.set_secondary_tex(0, None);
                overlay.set_colors(0, draw.fg, draw.fg, HIDDEN);
            }
        }
    }
}
