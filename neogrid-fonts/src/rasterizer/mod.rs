//! Glyph rasterization.
//!
//! A rasterizer turns `(codepoint, style)` into a white coverage mask sized to
//! exactly one or two grid cells. The atlas consumes images through the
//! [`GlyphRasterizer`] trait, so tests can substitute a deterministic
//! implementation for [`FontRasterizer`].

mod canvas;
pub mod decorations;
mod outline;

pub use canvas::Canvas;
pub use outline::FontRasterizer;

/// macOS renders 1pt as 1 logical pixel.
pub const MACOS_PLATFORM_DPI: f32 = 72.0;
/// Windows and most Linux desktops use 96 DPI.
pub const DEFAULT_PLATFORM_DPI: f32 = 96.0;
/// DPI at which a point equals a pixel.
pub const FONT_REFERENCE_DPI: f32 = 72.0;

/// Platform DPI before the window scale factor is applied.
pub fn platform_dpi() -> f32 {
    if cfg!(target_os = "macos") {
        MACOS_PLATFORM_DPI
    } else {
        DEFAULT_PLATFORM_DPI
    }
}

/// Pixel size of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
    /// Distance from the cell top to the text baseline
    pub baseline: u32,
}

impl CellSize {
    pub const fn new(width: u32, height: u32, baseline: u32) -> Self {
        Self {
            width,
            height,
            baseline,
        }
    }
}

/// Style flags that change a glyph's shape. Colors never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl GlyphStyle {
    pub const PLAIN: GlyphStyle = GlyphStyle {
        bold: false,
        italic: false,
        underline: false,
        strikethrough: false,
    };
}

/// A rasterized glyph: RGBA8, white with coverage in alpha.
#[derive(Clone, PartialEq, Eq)]
pub struct GlyphImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for GlyphImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl GlyphImage {
    /// Expand an 8-bit coverage mask into white RGBA.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Self {
        debug_assert_eq!(alpha.len(), (width * height) as usize);
        let mut pixels = Vec::with_capacity(alpha.len() * 4);
        for &a in alpha {
            pixels.extend_from_slice(&[255, 255, 255, a]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Coverage at `(x, y)`, or 0 outside the image.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[((y * self.width + x) * 4 + 3) as usize]
    }

    /// Number of texels with any coverage.
    pub fn coverage(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|p| p[3] > 0).count()
    }
}

/// Source of glyph images for the atlas.
pub trait GlyphRasterizer {
    /// Current cell size in pixels.
    fn cell_size(&self) -> CellSize;

    /// Rasterize `ch` with `style`.
    ///
    /// The result is exactly one cell tall and one or two cells wide. `None`
    /// means no available face has the glyph and the caller should use the
    /// unsupported placeholder.
    fn render(&mut self, ch: char, style: GlyphStyle) -> Option<GlyphImage>;

    /// The shared undercurl image, one cell in size.
    fn render_undercurl(&mut self) -> GlyphImage {
        decorations::undercurl(self.cell_size()).into_image()
    }

    /// The shared placeholder for glyphs no face can render.
    fn render_unsupported(&mut self) -> GlyphImage {
        decorations::unsupported(self.cell_size()).into_image()
    }
}
