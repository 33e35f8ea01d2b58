//! GPU-facing half of the neogrid renderer.
//!
//! This crate provides:
//!
//! - [`GlyphKey`]: the content-addressed identity of a rasterized glyph
//! - [`GlyphAtlas`]: shelf-packed glyph cache with grow-or-reset overflow and
//!   incremental texture uploads
//! - [`GlyphContext`]: an atlas paired with the rasterizer that fills it
//! - [`VertexStream`]: one GPU record per grid cell plus reserved overlay
//!   records, uploaded as the changed grid and overlay spans
//! - [`RenderBackend`]: the data contract any GPU backend implements, and
//!   [`gpu::WgpuBackend`], the wgpu implementation

pub mod atlas;
pub mod backend;
pub mod error;
pub mod glyph_context;
pub mod glyph_key;
pub mod gpu;
pub mod vertex_stream;

// Re-export main public types
pub use atlas::{AtlasRect, AtlasUpload, GlyphAtlas};
pub use backend::{FrameUniforms, FrameUpload, RenderBackend};
pub use error::{AtlasError, RenderError};
pub use glyph_context::GlyphContext;
pub use glyph_key::GlyphKey;
pub use vertex_stream::{
    CellDraw, CellVertex, OverlayWriter, ReservedRange, UploadSpan, VertexStream, VertexUpload,
};
