//! Glyph identity used to address the atlas cache.

use neogrid_fonts::GlyphStyle;

/// A glyph's cache identity: codepoint plus the style flags that change its
/// shape, packed into a `u64`.
///
/// Colors are not part of the key; glyphs are stored as white coverage masks
/// and tinted when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphKey(u64);

const CODEPOINT_MASK: u64 = 0x1F_FFFF;
const BOLD: u64 = 1 << 21;
const ITALIC: u64 = 1 << 22;
const UNDERLINE: u64 = 1 << 23;
const STRIKETHROUGH: u64 = 1 << 24;

impl GlyphKey {
    /// The shared undercurl image.
    pub const UNDERCURL: GlyphKey = GlyphKey(0x11_0000);
    /// The shared placeholder for glyphs no font provides.
    pub const UNSUPPORTED: GlyphKey = GlyphKey(0x11_0001);

    pub fn new(ch: char, style: GlyphStyle) -> Self {
        let mut bits = ch as u64;
        if style.bold {
            bits |= BOLD;
        }
        if style.italic {
            bits |= ITALIC;
        }
        if style.underline {
            bits |= UNDERLINE;
        }
        if style.strikethrough {
            bits |= STRIKETHROUGH;
        }
        GlyphKey(bits)
    }

    pub fn codepoint(self) -> u32 {
        (self.0 & CODEPOINT_MASK) as u32
    }

    /// The character, or `None` for the reserved keys.
    pub fn char(self) -> Option<char> {
        char::from_u32(self.codepoint())
    }

    pub fn style(self) -> GlyphStyle {
        GlyphStyle {
            bold: self.0 & BOLD != 0,
            italic: self.0 & ITALIC != 0,
            underline: self.0 & UNDERLINE != 0,
            strikethrough: self.0 & STRIKETHROUGH != 0,
        }
    }

    /// Whether this is one of the sentinel keys outside the Unicode range.
    pub fn is_reserved(self) -> bool {
        self.codepoint() > char::MAX as u32
    }
}
