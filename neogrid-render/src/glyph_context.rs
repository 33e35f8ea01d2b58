//! The atlas together with the rasterizer that fills it.

use neogrid_fonts::{CellSize, GlyphRasterizer};

use crate::atlas::{AtlasRect, GlyphAtlas};
use crate::glyph_key::GlyphKey;

/// Shared glyph state handed to everything that resolves glyphs.
///
/// Several grids may draw through one context; they then share its atlas
/// and therefore its generation.
pub struct GlyphContext<R: GlyphRasterizer> {
    pub atlas: GlyphAtlas,
    pub rasterizer: R,
}

impl<R: GlyphRasterizer> GlyphContext<R> {
    /// Build a context whose atlas shelves match the rasterizer's cell height.
    pub fn new(rasterizer: R, atlas_width: u32, atlas_initial_height: u32, atlas_max_height: u32) -> Self {
        let shelf = rasterizer.cell_size().height;
        Self {
            atlas: GlyphAtlas::new(atlas_width, atlas_initial_height, atlas_max_height, shelf),
            rasterizer,
        }
    }

    pub fn cell_size(&self) -> CellSize {
        self.rasterizer.cell_size()
    }

    pub fn resolve(&mut self, key: GlyphKey) -> Option<AtlasRect> {
        self.atlas.resolve(key, &mut self.rasterizer)
    }

    /// Drop every cached glyph after the rasterizer's output changed.
    pub fn reset(&mut self) {
        let shelf = self.rasterizer.cell_size().height;
        self.atlas.reconfigure(shelf);
    }
}
