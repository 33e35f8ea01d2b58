//! Highlight attribute table and color resolution.

use std::collections::HashMap;

use neogrid_config::{Config, Rgb};
use neogrid_fonts::GlyphStyle;
use neogrid_render::CellDraw;

use super::cell::Cell;

/// A highlight definition. Unset colors fall back to the grid defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighlightAttribute {
    pub foreground: Option<Rgb>,
    pub background: Option<Rgb>,
    pub special: Option<Rgb>,
    pub reverse: bool,
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
    pub undercurl: bool,
    pub strikethrough: bool,
    /// Background transparency, 0 (opaque) to 100
    pub blend: u8,
}

impl HighlightAttribute {
    pub fn glyph_style(&self) -> GlyphStyle {
        GlyphStyle {
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strikethrough: self.strikethrough,
        }
    }
}

/// Grid-wide colors used by id 0 and by unset attribute colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultColors {
    pub foreground: Rgb,
    pub background: Rgb,
    pub special: Rgb,
}

impl DefaultColors {
    pub fn from_config(config: &Config) -> Self {
        Self {
            foreground: config.default_foreground,
            background: config.default_background,
            special: config.default_special,
        }
    }
}

impl Default for DefaultColors {
    fn default() -> Self {
        Self {
            foreground: Rgb::WHITE,
            background: Rgb::BLACK,
            special: Rgb(0xFF0000),
        }
    }
}

/// Highlight definitions keyed by id. Id 0 is never stored.
#[derive(Debug, Clone, Default)]
pub struct HighlightTable {
    attrs: HashMap<u32, HighlightAttribute>,
}

impl HighlightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `attr` under `id`. Returns false for the reserved id 0.
    pub fn define(&mut self, id: u32, attr: HighlightAttribute) -> bool {
        if id == 0 {
            log::error!("Highlight id 0 is reserved for the defaults; definition ignored");
            return false;
        }
        self.attrs.insert(id, attr);
        true
    }

    pub fn get(&self, id: u32) -> Option<&HighlightAttribute> {
        self.attrs.get(&id)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// The draw parameters for `cell`. Unknown ids draw with the defaults.
    pub fn cell_draw(&self, cell: &Cell, defaults: &DefaultColors) -> CellDraw {
        let attr = self.get(cell.attr_id).copied().unwrap_or_default();

        let mut fg = attr.foreground.unwrap_or(defaults.foreground);
        let mut bg = attr.background.unwrap_or(defaults.background);
        if attr.reverse {
            std::mem::swap(&mut fg, &mut bg);
        }
        let sp = attr.special.unwrap_or(defaults.special);
        let bg_alpha = 1.0 - f32::from(attr.blend.min(100)) / 100.0;

        CellDraw {
            ch: cell.ch,
            style: attr.glyph_style(),
            undercurl: attr.undercurl,
            fg: fg.to_f32_a(1.0),
            bg: bg.to_f32_a(bg_alpha),
            sp: sp.to_f32_a(1.0),
        }
    }
}
