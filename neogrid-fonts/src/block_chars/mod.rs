//! Procedural rendering of box drawing and block element characters.
//!
//! These glyphs are drawn geometrically instead of taken from the font so
//! adjacent cells join seamlessly regardless of the font's coverage or
//! metrics.

mod block_elements;
mod box_drawing;
mod types;

pub use block_elements::get_block_geometry;
pub use box_drawing::{Weight, box_arms, draw_box_drawing};
pub use types::{BlockCharType, BlockGeometry, GeometricBlock, PixelRect, ranges};

use crate::rasterizer::Canvas;

/// Classify a character for procedural rendering.
pub fn classify_char(ch: char) -> BlockCharType {
    let code = ch as u32;

    if (ranges::BOX_DRAWING_START..=ranges::BOX_DRAWING_END).contains(&code) {
        return BlockCharType::BoxDrawing;
    }

    if (ranges::BLOCK_ELEMENTS_START..=ranges::BLOCK_ELEMENTS_END).contains(&code) {
        return match ch {
            '\u{2591}'..='\u{2593}' => BlockCharType::Shade,
            '\u{2588}' => BlockCharType::SolidBlock,
            _ => BlockCharType::PartialBlock,
        };
    }

    BlockCharType::None
}

/// Draw `ch` onto a one-cell canvas if it is a procedural character.
///
/// Returns `false` (leaving the canvas untouched) for every other character.
pub fn draw_block_char(ch: char, canvas: &mut Canvas) -> bool {
    match classify_char(ch) {
        BlockCharType::None => false,
        BlockCharType::BoxDrawing => draw_box_drawing(ch, canvas),
        BlockCharType::SolidBlock | BlockCharType::PartialBlock | BlockCharType::Shade => {
            let Some(geometry) = get_block_geometry(ch) else {
                return false;
            };
            let cell_w = canvas.width() as f32;
            let cell_h = canvas.height() as f32;
            for block in geometry.segments {
                block
                    .to_pixel_rect(cell_w, cell_h)
                    .snap_to_pixels()
                    .fill(canvas, geometry.alpha);
            }
            true
        }
    }
}
