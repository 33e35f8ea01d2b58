//! Shared integration test helpers for neogrid.
//!
//! Include with `mod common;` at the top of a test file. The frame driver is
//! exercised against [`RecordingBackend`], which mirrors uploads into CPU
//! buffers instead of a GPU, and [`FakeRasterizer`], which draws
//! deterministic glyphs without system fonts.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use neogrid::{EventQueue, FrameDriver, RedrawEvent};
use neogrid_config::Config;
use neogrid_fonts::{CellSize, GlyphImage, GlyphRasterizer, GlyphStyle};
use neogrid_render::{AtlasUpload, CellVertex, FrameUniforms, FrameUpload, RenderBackend, RenderError, VertexUpload};

pub const CELL: CellSize = CellSize::new(8, 16, 12);

/// Character the fake rasterizer cannot render.
pub const MISSING: char = '\u{10FFFD}';

/// Glyphs are solid blocks: one cell wide, two cells for CJK ideographs.
pub struct FakeRasterizer {
    pub cell: CellSize,
    pub renders: HashMap<(char, GlyphStyle), usize>,
}

impl FakeRasterizer {
    pub fn new() -> Self {
        Self {
            cell: CELL,
            renders: HashMap::new(),
        }
    }

    pub fn render_count(&self, ch: char) -> usize {
        self.renders
            .iter()
            .filter(|((c, _), _)| *c == ch)
            .map(|(_, n)| n)
            .sum()
    }
}

pub fn is_wide(ch: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&ch)
}

impl GlyphRasterizer for FakeRasterizer {
    fn cell_size(&self) -> CellSize {
        self.cell
    }

    fn render(&mut self, ch: char, style: GlyphStyle) -> Option<GlyphImage> {
        *self.renders.entry((ch, style)).or_default() += 1;
        if ch == MISSING {
            return None;
        }
        let width = if is_wide(ch) { self.cell.width * 2 } else { self.cell.width };
        let alpha = vec![(ch as u32 % 251) as u8 + 1; (width * self.cell.height) as usize];
        Some(GlyphImage::from_alpha(width, self.cell.height, &alpha))
    }
}

/// What one `render` call received, with borrowed bytes summarized.
#[derive(Debug, Clone, PartialEq)]
pub enum VertexRecord {
    None,
    /// `(byte_offset, len)` per span
    Partial(Vec<(u64, usize)>),
    Full { len: usize },
}

#[derive(Debug, Clone)]
pub struct RecordedFrame {
    pub atlas: Option<AtlasUpload>,
    pub vertices: VertexRecord,
    pub uniforms: FrameUniforms,
    pub instance_count: u32,
    pub clear_color: [f32; 4],
}

/// Backend that keeps CPU copies of what a GPU would hold.
pub struct RecordingBackend {
    pub frames: Vec<RecordedFrame>,
    pub resizes: Vec<(u32, u32)>,
    pub max_texture: u32,
    /// The instance buffer as uploads left it
    pub gpu_vertices: Vec<u8>,
    /// The atlas texture as uploads left it, with its size
    pub gpu_atlas: Vec<u8>,
    pub gpu_atlas_size: (u32, u32),
    pub fail_next: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            resizes: Vec::new(),
            max_texture: 8192,
            gpu_vertices: Vec::new(),
            gpu_atlas: Vec::new(),
            gpu_atlas_size: (0, 0),
            fail_next: false,
        }
    }

    pub fn last_frame(&self) -> &RecordedFrame {
        self.frames.last().expect("no frame rendered")
    }
}

impl RenderBackend for RecordingBackend {
    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn max_texture_dimension(&self) -> u32 {
        self.max_texture
    }

    fn render(&mut self, frame: FrameUpload<'_>) -> Result<(), RenderError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(RenderError::DeviceError("device lost".into()));
        }

        match &frame.atlas {
            Some(AtlasUpload::Full { width, height, pixels }) => {
                self.gpu_atlas = pixels.clone();
                self.gpu_atlas_size = (*width, *height);
            }
            Some(AtlasUpload::Rows { y, pixels, .. }) => {
                let start = (*y * self.gpu_atlas_size.0 * 4) as usize;
                self.gpu_atlas[start..start + pixels.len()].copy_from_slice(pixels);
            }
            None => {}
        }

        let vertices = match frame.vertices {
            VertexUpload::None => VertexRecord::None,
            VertexUpload::Full { bytes } => {
                self.gpu_vertices = bytes.to_vec();
                VertexRecord::Full { len: bytes.len() }
            }
            VertexUpload::Partial(spans) => {
                for span in &spans {
                    let start = span.byte_offset as usize;
                    self.gpu_vertices[start..start + span.bytes.len()].copy_from_slice(span.bytes);
                }
                VertexRecord::Partial(
                    spans
                        .iter()
                        .map(|span| (span.byte_offset, span.bytes.len()))
                        .collect(),
                )
            }
        };

        self.frames.push(RecordedFrame {
            atlas: frame.atlas,
            vertices,
            uniforms: frame.uniforms,
            instance_count: frame.instance_count,
            clear_color: frame.clear_color,
        });
        Ok(())
    }
}

pub type TestDriver = FrameDriver<RecordingBackend, FakeRasterizer>;

pub fn test_config(rows: usize, cols: usize) -> Config {
    Config {
        initial_rows: rows,
        initial_cols: cols,
        ..Config::default()
    }
}

pub fn driver_with(config: &Config) -> TestDriver {
    FrameDriver::new(
        RecordingBackend::new(),
        FakeRasterizer::new(),
        Arc::new(EventQueue::new()),
        config,
    )
}

pub fn driver(rows: usize, cols: usize) -> TestDriver {
    driver_with(&test_config(rows, cols))
}

/// Push `events` plus a flush and render one frame.
pub fn send(driver: &mut TestDriver, events: impl IntoIterator<Item = RedrawEvent>) {
    driver.queue().extend(events);
    driver.queue().push(RedrawEvent::Flush);
    driver.render_frame().expect("render failed");
}

/// Record bytes as the instance buffer would hold them.
pub fn stream_bytes(records: &[CellVertex]) -> Vec<u8> {
    bytemuck::cast_slice(records).to_vec()
}
