//! Glyph atlas behavior through a counting rasterizer.

use std::collections::HashMap;

use neogrid_fonts::{CellSize, GlyphImage, GlyphRasterizer, GlyphStyle};
use neogrid_render::{AtlasUpload, GlyphAtlas, GlyphContext, GlyphKey};

const CELL: CellSize = CellSize::new(10, 20, 15);

/// Renders solid cells and counts every call. Digits are unrenderable.
#[derive(Default)]
struct CountingRasterizer {
    renders: HashMap<char, usize>,
    undercurls: usize,
    placeholders: usize,
}

impl GlyphRasterizer for CountingRasterizer {
    fn cell_size(&self) -> CellSize {
        CELL
    }

    fn render(&mut self, ch: char, _style: GlyphStyle) -> Option<GlyphImage> {
        *self.renders.entry(ch).or_default() += 1;
        if ch.is_ascii_digit() {
            return None;
        }
        let alpha = vec![200; (CELL.width * CELL.height) as usize];
        Some(GlyphImage::from_alpha(CELL.width, CELL.height, &alpha))
    }

    fn render_undercurl(&mut self) -> GlyphImage {
        self.undercurls += 1;
        GlyphImage::from_alpha(CELL.width, CELL.height, &vec![0; 200])
    }

    fn render_unsupported(&mut self) -> GlyphImage {
        self.placeholders += 1;
        GlyphImage::from_alpha(CELL.width, CELL.height, &vec![255; 200])
    }
}

fn key(ch: char) -> GlyphKey {
    GlyphKey::new(ch, GlyphStyle::PLAIN)
}

#[test]
fn test_second_resolve_is_cache_hit() {
    let mut ctx = GlyphContext::new(CountingRasterizer::default(), 100, 40, 80);
    let first = ctx.resolve(key('a')).unwrap();
    let pen = ctx.atlas.pen();
    let second = ctx.resolve(key('a')).unwrap();

    assert_eq!(first, second);
    assert_eq!(ctx.atlas.pen(), pen);
    assert_eq!(ctx.rasterizer.renders[&'a'], 1);
}

#[test]
fn test_unrenderable_glyphs_share_one_placeholder() {
    let mut ctx = GlyphContext::new(CountingRasterizer::default(), 100, 40, 80);
    let one = ctx.resolve(key('1')).unwrap();
    let two = ctx.resolve(key('2')).unwrap();
    let again = ctx.resolve(key('1')).unwrap();

    assert_eq!(one, two);
    assert_eq!(one, again);
    assert_eq!(ctx.atlas.get_rect(GlyphKey::UNSUPPORTED), Some(one));
    assert_eq!(ctx.rasterizer.placeholders, 1);
    // The alias stops the codepoint from being retried.
    assert_eq!(ctx.rasterizer.renders[&'1'], 1);
}

#[test]
fn test_undercurl_rendered_once_per_generation() {
    let mut ctx = GlyphContext::new(CountingRasterizer::default(), 100, 40, 80);
    ctx.resolve(GlyphKey::UNDERCURL).unwrap();
    ctx.resolve(GlyphKey::UNDERCURL).unwrap();
    assert_eq!(ctx.rasterizer.undercurls, 1);

    ctx.atlas.clear();
    ctx.resolve(GlyphKey::UNDERCURL).unwrap();
    assert_eq!(ctx.rasterizer.undercurls, 2);
}

#[test]
fn test_overflow_invalidates_every_key() {
    // Two shelves of ten glyphs at the initial height, four at the ceiling.
    let mut ctx = GlyphContext::new(CountingRasterizer::default(), 100, 40, 80);
    let letters: Vec<char> = ('a'..='t').collect();
    for &ch in &letters {
        ctx.resolve(key(ch)).unwrap();
    }
    assert_eq!(ctx.atlas.len(), 20);
    assert_eq!(ctx.atlas.generation(), 0);
    assert!(!ctx.atlas.take_invalidated());

    ctx.resolve(key('u')).unwrap();
    assert_eq!(ctx.atlas.height(), 80);
    assert_eq!(ctx.atlas.generation(), 1);
    assert!(ctx.atlas.take_invalidated());
    for &ch in &letters {
        assert_eq!(ctx.atlas.get_rect(key(ch)), None, "{ch} survived growth");
    }

    // A previously cached key renders again on its next lookup.
    ctx.resolve(key('a')).unwrap();
    assert_eq!(ctx.rasterizer.renders[&'a'], 2);
}

#[test]
fn test_reset_restores_initial_height_and_uploads_everything() {
    let mut ctx = GlyphContext::new(CountingRasterizer::default(), 100, 20, 80);
    for ch in 'a'..='l' {
        ctx.resolve(key(ch)).unwrap();
    }
    assert_eq!(ctx.atlas.height(), 40);
    let _ = ctx.atlas.take_upload();

    ctx.reset();
    assert_eq!(ctx.atlas.height(), 20);
    assert!(ctx.atlas.is_empty());
    match ctx.atlas.take_upload() {
        Some(AtlasUpload::Full { width, height, pixels }) => {
            assert_eq!((width, height), (100, 20));
            assert!(pixels.iter().all(|&b| b == 0));
        }
        other => panic!("expected a full upload, got {other:?}"),
    }
}

#[test]
fn test_every_rect_within_bounds() {
    let mut atlas = GlyphAtlas::new(64, 16, 64, 16);
    let image = GlyphImage::from_alpha(12, 16, &[255; 12 * 16]);
    for ch in 'A'..='z' {
        let rect = atlas.resolve_or_insert(key(ch), || image.clone()).unwrap();
        assert!(rect.x + rect.width <= atlas.width());
        assert!(rect.y + rect.height <= atlas.height());
    }
}
