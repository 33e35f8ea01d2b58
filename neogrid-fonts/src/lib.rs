//! Font loading and glyph rasterization for the neogrid renderer.
//!
//! This crate provides:
//! - Font loading with system font discovery and a fallback chain
//! - The `GlyphRasterizer` trait consumed by the glyph atlas
//! - `FontRasterizer`, which rasterizes outline glyphs with swash
//! - Procedural box-drawing and block-element glyphs
//! - Procedural decorations: underline, strikethrough, undercurl and the
//!   "unsupported glyph" placeholder
//!
//! All images are white coverage masks in RGBA8; color is applied at draw time.

pub mod block_chars;
pub mod error;
pub mod font_manager;
pub mod rasterizer;

// Re-export main types for convenience
pub use error::FontError;
pub use font_manager::{FALLBACK_FAMILIES, FontData, FontManager};
pub use rasterizer::{
    Canvas, CellSize, FontRasterizer, GlyphImage, GlyphRasterizer, GlyphStyle, platform_dpi,
};
