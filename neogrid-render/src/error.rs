//! Typed error types for neogrid-render.

use thiserror::Error;

/// Errors from the GPU backend.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No adapter can present to the window surface.
    #[error("no GPU adapter can present to this window")]
    AdapterNotFound,

    /// Device creation failed or the device was lost.
    #[error("GPU device: {0}")]
    DeviceError(String),

    #[error("cannot create a surface for the window: {0}")]
    SurfaceCreation(String),

    /// Acquiring the next frame failed after a reconfigure.
    #[error("surface frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        RenderError::SurfaceCreation(e.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderError::DeviceError(e.to_string())
    }
}

/// Errors from glyph atlas packing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtlasError {
    /// The image cannot fit even in an empty atlas at its maximum size.
    #[error("glyph {width}x{height} does not fit in a {atlas_width}x{max_height} atlas")]
    GlyphTooLarge {
        width: u32,
        height: u32,
        atlas_width: u32,
        max_height: u32,
    },
}
