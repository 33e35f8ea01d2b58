//! `FontRasterizer`: the font-backed `GlyphRasterizer`.

use swash::FontRef;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;

use super::{Canvas, CellSize, FONT_REFERENCE_DPI, GlyphImage, GlyphRasterizer, GlyphStyle};
use super::decorations;
use crate::block_chars;
use crate::error::FontError;
use crate::font_manager::FontManager;

/// Scaled vertical metrics of the primary face.
#[derive(Debug, Clone, Copy)]
struct FaceMetrics {
    px_size: f32,
    ascent: f32,
    descent: f32,
    leading: f32,
    advance: f32,
}

impl FaceMetrics {
    fn measure(font: FontRef<'static>, px_size: f32) -> Self {
        let metrics = font.metrics(&[]);
        let scale = px_size / metrics.units_per_em as f32;
        let glyph_id = font.charmap().map('M');
        let advance = font.glyph_metrics(&[]).advance_width(glyph_id) * scale;
        Self {
            px_size,
            ascent: metrics.ascent * scale,
            descent: metrics.descent * scale,
            leading: metrics.leading * scale,
            advance,
        }
    }

    fn cell_size(&self) -> CellSize {
        let width = self.advance.round().max(1.0) as u32;
        let height = (self.ascent + self.descent + self.leading).ceil().max(1.0) as u32;
        let baseline = (self.ascent.round() as u32).min(height.saturating_sub(1));
        CellSize::new(width, height, baseline)
    }
}

fn pixel_size(size_pt: f32, dpi: f32) -> Result<f32, FontError> {
    if !(size_pt.is_finite() && size_pt > 0.0 && dpi.is_finite() && dpi > 0.0) {
        return Err(FontError::InvalidSize { size_pt, dpi });
    }
    Ok((size_pt * dpi / FONT_REFERENCE_DPI).max(1.0))
}

/// Rasterizes glyphs from system fonts with swash, drawing box-drawing and
/// block characters procedurally when enabled.
pub struct FontRasterizer {
    fonts: FontManager,
    family: String,
    size_pt: f32,
    dpi: f32,
    box_drawing: bool,
    metrics: FaceMetrics,
    cell: CellSize,
    context: ScaleContext,
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer")
            .field("family", &self.family)
            .field("size_pt", &self.size_pt)
            .field("dpi", &self.dpi)
            .field("cell", &self.cell)
            .finish()
    }
}

impl FontRasterizer {
    /// Load the startup font. Falls back to a system monospace face if the
    /// family cannot be found; fails only when no face is usable at all.
    pub fn new(
        family_or_path: &str,
        size_pt: f32,
        dpi: f32,
        box_drawing: bool,
    ) -> Result<Self, FontError> {
        let px_size = pixel_size(size_pt, dpi)?;
        let fonts = FontManager::new(family_or_path)?;
        Ok(Self::with_fonts(
            fonts,
            family_or_path,
            size_pt,
            dpi,
            px_size,
            box_drawing,
        ))
    }

    fn with_fonts(
        fonts: FontManager,
        family: &str,
        size_pt: f32,
        dpi: f32,
        px_size: f32,
        box_drawing: bool,
    ) -> Self {
        let metrics = FaceMetrics::measure(fonts.primary_font(), px_size);
        let cell = metrics.cell_size();
        log::info!(
            "Font '{}' at {}pt/{}dpi: cell {}x{} baseline {}",
            fonts.primary_name(),
            size_pt,
            dpi,
            cell.width,
            cell.height,
            cell.baseline
        );
        Self {
            fonts,
            family: family.to_string(),
            size_pt,
            dpi,
            box_drawing,
            metrics,
            cell,
            context: ScaleContext::new(),
        }
    }

    /// Switch to a different font. On failure the current font stays active.
    pub fn set_font(&mut self, family_or_path: &str, size_pt: f32, dpi: f32) -> Result<(), FontError> {
        let px_size = pixel_size(size_pt, dpi)?;
        let fonts = FontManager::load_exact(family_or_path)?;
        *self = Self::with_fonts(
            fonts,
            family_or_path,
            size_pt,
            dpi,
            px_size,
            self.box_drawing,
        );
        Ok(())
    }

    /// Change the point size, keeping the current faces.
    pub fn set_font_size(&mut self, size_pt: f32) -> Result<(), FontError> {
        self.rescale(size_pt, self.dpi)
    }

    /// Change the DPI (e.g. after a scale-factor change).
    pub fn set_dpi(&mut self, dpi: f32) -> Result<(), FontError> {
        self.rescale(self.size_pt, dpi)
    }

    fn rescale(&mut self, size_pt: f32, dpi: f32) -> Result<(), FontError> {
        let px_size = pixel_size(size_pt, dpi)?;
        self.size_pt = size_pt;
        self.dpi = dpi;
        self.metrics = FaceMetrics::measure(self.fonts.primary_font(), px_size);
        self.cell = self.metrics.cell_size();
        log::info!(
            "Rescaled to {}pt/{}dpi: cell {}x{}",
            size_pt,
            dpi,
            self.cell.width,
            self.cell.height
        );
        Ok(())
    }

    pub fn set_box_drawing(&mut self, enabled: bool) {
        self.box_drawing = enabled;
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn font_size(&self) -> f32 {
        self.size_pt
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    pub fn box_drawing(&self) -> bool {
        self.box_drawing
    }

    /// Rasterize an outline glyph into a one- or two-cell canvas.
    fn render_outline(&mut self, ch: char, style: GlyphStyle) -> Option<Canvas> {
        let (font_idx, glyph_id) = self.fonts.find_glyph(ch, style.bold, style.italic)?;
        let font = self.fonts.get_font(font_idx)?;

        let units_per_em = font.metrics(&[]).units_per_em as f32;
        let advance =
            font.glyph_metrics(&[]).advance_width(glyph_id) * self.metrics.px_size / units_per_em;

        let mut scaler = self
            .context
            .builder(font)
            .size(self.metrics.px_size)
            .hint(true)
            .build();
        let image = Render::new(&[
            Source::Outline,
            Source::Bitmap(StrikeWith::BestFit),
            Source::ColorBitmap(StrikeWith::BestFit),
        ])
        .format(Format::Alpha)
        .render(&mut scaler, glyph_id);

        let cell_w = self.cell.width as f32;
        let ink_right = image
            .as_ref()
            .map_or(0, |img| img.placement.left + img.placement.width as i32);
        let wide = advance > cell_w + 0.5 || ink_right as f32 > cell_w * 1.5;

        let columns = if wide { 2 } else { 1 };
        let mut canvas = Canvas::new(self.cell.width * columns, self.cell.height);

        if let Some(image) = image {
            let width = image.placement.width;
            let height = image.placement.height;
            let top = self.cell.baseline as i32 - image.placement.top;
            match image.content {
                Content::Mask => {
                    canvas.blit_mask(image.placement.left, top, width, height, &image.data);
                }
                Content::Color => {
                    // Keep the coverage of color bitmaps; color comes from the cell
                    let alpha: Vec<u8> = image.data.chunks_exact(4).map(|px| px[3]).collect();
                    canvas.blit_mask(image.placement.left, top, width, height, &alpha);
                }
                Content::SubpixelMask => {
                    let alpha: Vec<u8> = image
                        .data
                        .chunks_exact(4)
                        .map(|px| px[0].max(px[1]).max(px[2]))
                        .collect();
                    canvas.blit_mask(image.placement.left, top, width, height, &alpha);
                }
            }
        }

        if style.bold && !self.fonts.is_bold_face(font_idx) {
            canvas.embolden();
        }
        Some(canvas)
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn cell_size(&self) -> CellSize {
        self.cell
    }

    fn render(&mut self, ch: char, style: GlyphStyle) -> Option<GlyphImage> {
        let mut canvas = if self.box_drawing {
            let mut canvas = Canvas::new(self.cell.width, self.cell.height);
            if block_chars::draw_block_char(ch, &mut canvas) {
                canvas
            } else {
                self.render_outline(ch, style)?
            }
        } else {
            self.render_outline(ch, style)?
        };

        decorations::apply_lines(&mut canvas, style, self.cell);
        Some(canvas.into_image())
    }
}
