//! Shelf-packed glyph atlas.
//!
//! Glyph images are packed left to right on shelves one cell tall. The atlas
//! keeps a CPU copy of its texels; [`GlyphAtlas::take_upload`] hands the
//! backend only the rows touched since the previous upload, or the whole
//! texture after a reset.
//!
//! When the pen runs off the bottom the atlas doubles its height (up to
//! `max_height`) or, at the ceiling, resets at the same size. Either way every
//! cached rectangle is dropped, the generation is bumped and the invalidation
//! flag is raised so the caller can schedule a full repaint.

use std::collections::HashMap;

use neogrid_fonts::{GlyphImage, GlyphRasterizer};

use crate::error::AtlasError;
use crate::glyph_key::GlyphKey;

/// A rectangle inside the atlas texture, in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtlasRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `[x, y, w, h]` as the vertex stream stores it.
    pub fn to_array(self) -> [f32; 4] {
        [
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        ]
    }
}

/// Texel data the GPU copy of the atlas needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasUpload {
    /// Rows `y..y + height` across the full atlas width.
    Rows { y: u32, height: u32, pixels: Vec<u8> },
    /// The whole texture, possibly at a new size.
    Full {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
}

/// Glyph cache plus its packed RGBA texture.
pub struct GlyphAtlas {
    width: u32,
    height: u32,
    initial_height: u32,
    max_height: u32,
    shelf_height: u32,

    pen_x: u32,
    pen_y: u32,
    row_height: u32,

    cache: HashMap<GlyphKey, AtlasRect>,
    pixels: Vec<u8>,

    generation: u64,
    invalidated: bool,
    /// Texel rows written since the last upload
    dirty_rows: Option<(u32, u32)>,
    needs_full_upload: bool,
}

impl GlyphAtlas {
    pub fn new(width: u32, initial_height: u32, max_height: u32, shelf_height: u32) -> Self {
        let width = width.max(1);
        let max_height = max_height.max(1);
        let height = initial_height.clamp(1, max_height);
        Self {
            width,
            height,
            initial_height: height,
            max_height,
            shelf_height,
            pen_x: 0,
            pen_y: 0,
            row_height: 0,
            cache: HashMap::new(),
            pixels: vec![0; (width * height * 4) as usize],
            generation: 0,
            invalidated: false,
            dirty_rows: None,
            needs_full_upload: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    pub fn shelf_height(&self) -> u32 {
        self.shelf_height
    }

    /// Next packing position.
    pub fn pen(&self) -> (u32, u32) {
        (self.pen_x, self.pen_y)
    }

    /// Number of cached keys, placeholder aliases included.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Bumped on every reset or growth.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fraction of the texture's shelves in use, `0.0..=1.0`.
    pub fn fill(&self) -> f32 {
        let used = (self.pen_y + self.row_height).min(self.height);
        used as f32 / self.height as f32
    }

    /// Read the invalidation flag and lower it.
    pub fn take_invalidated(&mut self) -> bool {
        std::mem::take(&mut self.invalidated)
    }

    pub fn get_rect(&self, key: GlyphKey) -> Option<AtlasRect> {
        self.cache.get(&key).copied()
    }

    /// Return the cached rectangle for `key`, rasterizing and packing it with
    /// `render` on a miss.
    ///
    /// Packing may overflow and reset the atlas; the returned rectangle is
    /// valid in the new generation.
    pub fn resolve_or_insert<F>(&mut self, key: GlyphKey, render: F) -> Result<AtlasRect, AtlasError>
    where
        F: FnOnce() -> GlyphImage,
    {
        if let Some(rect) = self.cache.get(&key) {
            return Ok(*rect);
        }
        let image = render();
        let rect = self.pack(&image)?;
        self.cache.insert(key, rect);
        Ok(rect)
    }

    /// Resolve `key` against `rasterizer`.
    ///
    /// Reserved keys render the shared undercurl or placeholder image. A
    /// codepoint the rasterizer cannot render is cached as an alias of the
    /// placeholder so it is never retried in this generation. `None` only
    /// when the image cannot fit in the atlas at all.
    pub fn resolve<R: GlyphRasterizer + ?Sized>(
        &mut self,
        key: GlyphKey,
        rasterizer: &mut R,
    ) -> Option<AtlasRect> {
        if let Some(rect) = self.cache.get(&key) {
            return Some(*rect);
        }

        let result = if key == GlyphKey::UNDERCURL {
            self.resolve_or_insert(key, || rasterizer.render_undercurl())
        } else if key == GlyphKey::UNSUPPORTED {
            self.resolve_or_insert(key, || rasterizer.render_unsupported())
        } else {
            let image = key.char().and_then(|ch| rasterizer.render(ch, key.style()));
            match image {
                Some(image) => self.resolve_or_insert(key, || image),
                None => {
                    log::debug!("No glyph for U+{:04X}, using placeholder", key.codepoint());
                    let placeholder = self.resolve(GlyphKey::UNSUPPORTED, rasterizer)?;
                    self.cache.insert(key, placeholder);
                    return Some(placeholder);
                }
            }
        };

        match result {
            Ok(rect) => Some(rect),
            Err(e) => {
                log::error!("Glyph U+{:04X} not cached: {}", key.codepoint(), e);
                None
            }
        }
    }

    /// Drop every cached glyph and restart packing at the same size.
    pub fn clear(&mut self) {
        self.reset(self.height);
    }

    /// Restart at the initial height with a new shelf height, after a font
    /// or size change.
    pub fn reconfigure(&mut self, shelf_height: u32) {
        self.shelf_height = shelf_height;
        self.reset(self.initial_height);
    }

    /// Lower the growth ceiling, e.g. to the device's max texture size.
    pub fn set_max_height(&mut self, max_height: u32) {
        self.max_height = max_height.max(1);
        self.initial_height = self.initial_height.min(self.max_height);
        if self.height > self.max_height {
            self.reset(self.initial_height);
        }
    }

    /// Pending texel upload, if any.
    pub fn take_upload(&mut self) -> Option<AtlasUpload> {
        if self.needs_full_upload {
            self.needs_full_upload = false;
            self.dirty_rows = None;
            return Some(AtlasUpload::Full {
                width: self.width,
                height: self.height,
                pixels: self.pixels.clone(),
            });
        }

        let (start, end) = self.dirty_rows.take()?;
        let stride = (self.width * 4) as usize;
        Some(AtlasUpload::Rows {
            y: start,
            height: end - start,
            pixels: self.pixels[start as usize * stride..end as usize * stride].to_vec(),
        })
    }

    /// Resend the whole texture with the next upload.
    pub fn invalidate_upload(&mut self) {
        self.needs_full_upload = true;
    }

    /// The CPU copy of the texture, RGBA8 rows of `width` texels.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn reset(&mut self, height: u32) {
        self.height = height;
        self.pixels.clear();
        self.pixels.resize((self.width * self.height * 4) as usize, 0);
        self.cache.clear();
        self.pen_x = 0;
        self.pen_y = 0;
        self.row_height = 0;
        self.generation += 1;
        self.invalidated = true;
        self.dirty_rows = None;
        self.needs_full_upload = true;
    }

    fn overflow(&mut self) {
        if self.height * 2 <= self.max_height {
            log::info!(
                "Glyph atlas full, growing {}x{} -> {}x{}",
                self.width,
                self.height,
                self.width,
                self.height * 2
            );
            self.reset(self.height * 2);
        } else {
            log::warn!(
                "Glyph atlas full at maximum height {}, resetting",
                self.max_height
            );
            self.reset(self.height);
        }
    }

    fn pack(&mut self, image: &GlyphImage) -> Result<AtlasRect, AtlasError> {
        let (w, h) = (image.width, image.height);
        if w > self.width || h > self.max_height {
            return Err(AtlasError::GlyphTooLarge {
                width: w,
                height: h,
                atlas_width: self.width,
                max_height: self.max_height,
            });
        }

        if self.pen_x + w > self.width {
            self.pen_x = 0;
            self.pen_y += self.row_height;
            self.row_height = 0;
        }

        while self.pen_y + h > self.height {
            let before = self.height;
            self.overflow();
            if self.height == before && h > self.height {
                // Reset at the ceiling did not make room.
                return Err(AtlasError::GlyphTooLarge {
                    width: w,
                    height: h,
                    atlas_width: self.width,
                    max_height: self.height,
                });
            }
        }

        let rect = AtlasRect::new(self.pen_x, self.pen_y, w, h);
        self.blit(rect, image);

        self.pen_x += w;
        self.row_height = self.row_height.max(h).max(self.shelf_height);
        Ok(rect)
    }

    fn blit(&mut self, rect: AtlasRect, image: &GlyphImage) {
        let stride = (self.width * 4) as usize;
        let row_bytes = (rect.width * 4) as usize;
        for row in 0..rect.height as usize {
            let src = row * row_bytes;
            let Some(src_row) = image.pixels.get(src..src + row_bytes) else {
                break;
            };
            let dst = (rect.y as usize + row) * stride + rect.x as usize * 4;
            self.pixels[dst..dst + row_bytes].copy_from_slice(src_row);
        }

        if rect.height > 0 {
            let (start, end) = (rect.y, rect.y + rect.height);
            self.dirty_rows = Some(match self.dirty_rows {
                Some((s, e)) => (s.min(start), e.max(end)),
                None => (start, end),
            });
        }
    }
}
