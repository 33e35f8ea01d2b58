//! Block element character rendering (U+2580–U+259F).
//!
//! Half blocks, eighth blocks, quadrants (including the three-quadrant
//! combinations) and the three shade levels.

use super::types::{BlockGeometry, GeometricBlock};

/// Quadrant bitmasks for U+2596..=U+259F: bit 3 = upper left, bit 2 = upper
/// right, bit 1 = lower left, bit 0 = lower right.
const QUADRANTS: [u8; 10] = [
    0b0010, // ▖
    0b0001, // ▗
    0b1000, // ▘
    0b1011, // ▙
    0b1001, // ▚
    0b1110, // ▛
    0b1101, // ▜
    0b0100, // ▝
    0b0110, // ▞
    0b0111, // ▟
];

fn quadrants(mask: u8) -> Vec<GeometricBlock> {
    let mut blocks = Vec::with_capacity(4);
    if mask & 0b1000 != 0 {
        blocks.push(GeometricBlock::new(0.0, 0.0, 0.5, 0.5));
    }
    if mask & 0b0100 != 0 {
        blocks.push(GeometricBlock::new(0.5, 0.0, 0.5, 0.5));
    }
    if mask & 0b0010 != 0 {
        blocks.push(GeometricBlock::new(0.0, 0.5, 0.5, 0.5));
    }
    if mask & 0b0001 != 0 {
        blocks.push(GeometricBlock::new(0.5, 0.5, 0.5, 0.5));
    }
    blocks
}

/// Get the geometric representation of a block element character.
pub fn get_block_geometry(ch: char) -> Option<BlockGeometry> {
    let code = ch as u32;
    let geometry = match ch {
        // Upper half block
        '\u{2580}' => BlockGeometry::solid(vec![GeometricBlock::new(0.0, 0.0, 1.0, 0.5)]),

        // Lower one eighth to lower seven eighths
        '\u{2581}'..='\u{2587}' => {
            let fraction = (code - 0x2580) as f32 / 8.0;
            BlockGeometry::solid(vec![GeometricBlock::new(
                0.0,
                1.0 - fraction,
                1.0,
                fraction,
            )])
        }

        // Full block
        '\u{2588}' => BlockGeometry::solid(vec![GeometricBlock::full()]),

        // Left seven eighths down to left one eighth
        '\u{2589}'..='\u{258F}' => {
            let fraction = (0x2590 - code) as f32 / 8.0;
            BlockGeometry::solid(vec![GeometricBlock::new(0.0, 0.0, fraction, 1.0)])
        }

        // Right half block
        '\u{2590}' => BlockGeometry::solid(vec![GeometricBlock::new(0.5, 0.0, 0.5, 1.0)]),

        // Light, medium and dark shade: uniform 25%, 50%, 75% coverage
        '\u{2591}'..='\u{2593}' => BlockGeometry {
            segments: vec![GeometricBlock::full()],
            alpha: ((code - 0x2590) * 64).min(255) as u8,
        },

        // Upper one eighth block
        '\u{2594}' => BlockGeometry::solid(vec![GeometricBlock::new(0.0, 0.0, 1.0, 0.125)]),

        // Right one eighth block
        '\u{2595}' => BlockGeometry::solid(vec![GeometricBlock::new(0.875, 0.0, 0.125, 1.0)]),

        '\u{2596}'..='\u{259F}' => {
            BlockGeometry::solid(quadrants(QUADRANTS[(code - 0x2596) as usize]))
        }

        _ => return None,
    };
    Some(geometry)
}
