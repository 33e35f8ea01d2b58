//! Data contract between the frame driver and a GPU backend.
//!
//! A backend owns one atlas texture, one instance buffer of
//! [`CellVertex`](crate::CellVertex) records and a uniform block. Each frame
//! it applies the pending uploads, draws every record as an instanced quad in
//! a single draw call and presents.

use bytemuck::{Pod, Zeroable};

use crate::atlas::AtlasUpload;
use crate::error::RenderError;
use crate::vertex_stream::VertexUpload;

/// Per-frame shader constants.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Surface size in pixels
    pub viewport_size: [f32; 2],
    /// Atlas texture size in texels
    pub atlas_size: [f32; 2],
    /// Shared undercurl image `[x, y, w, h]` in texels
    pub undercurl_rect: [f32; 4],
}

/// Everything a backend needs for one frame.
#[derive(Debug)]
pub struct FrameUpload<'a> {
    pub atlas: Option<AtlasUpload>,
    pub vertices: VertexUpload<'a>,
    pub uniforms: FrameUniforms,
    pub instance_count: u32,
    pub clear_color: [f32; 4],
}

pub trait RenderBackend {
    /// The surface changed size in pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Largest texture side the device accepts.
    fn max_texture_dimension(&self) -> u32;

    /// Apply `frame`'s uploads, draw once and present.
    fn render(&mut self, frame: FrameUpload<'_>) -> Result<(), RenderError>;
}
