//! Per-tick orchestration: drain editor batches, repaint damaged rows, upload
//! and draw.
//!
//! The driver owns every GPU-facing resource. Editor updates reach it only
//! through the shared [`EventQueue`]; one call to
//! [`FrameDriver::render_frame`] applies all sealed batches, rewrites the
//! vertex records of dirty rows and issues a single draw.

mod state;

pub use state::{FrameState, FrameStats};

use std::sync::Arc;

use neogrid_config::Config;
use neogrid_fonts::{CellSize, FontError, FontRasterizer, GlyphRasterizer};
use neogrid_render::{
    CellDraw, FrameUniforms, FrameUpload, GlyphContext, RenderBackend, RenderError, VertexStream,
};

use crate::cursor::CursorOverlay;
use crate::event_queue::EventQueue;
use crate::grid::{CellGrid, DefaultColors, GridError, ScrollRegion};
use crate::redraw::RedrawEvent;

/// Full rescans allowed when the atlas resets during a scan.
const MAX_RESCANS: usize = 2;

pub struct FrameDriver<B: RenderBackend, R: GlyphRasterizer> {
    grid: CellGrid,
    stream: VertexStream,
    glyphs: GlyphContext<R>,
    cursor: CursorOverlay,
    backend: B,
    queue: Arc<EventQueue>,
    state: FrameState,
    stats: FrameStats,
    viewport: (u32, u32),
    /// Present even without new damage, e.g. after a surface resize
    needs_present: bool,
    row_scratch: Vec<CellDraw>,
}

impl<B: RenderBackend, R: GlyphRasterizer> FrameDriver<B, R> {
    pub fn new(backend: B, rasterizer: R, queue: Arc<EventQueue>, config: &Config) -> Self {
        let max_texture = backend.max_texture_dimension();
        let glyphs = GlyphContext::new(
            rasterizer,
            config.atlas_width.min(max_texture),
            config.atlas_initial_height.min(max_texture),
            config.atlas_max_height.min(max_texture),
        );
        let cell = glyphs.cell_size();
        let (rows, cols) = (config.initial_rows, config.initial_cols);

        let mut stream = VertexStream::new(rows, cols, cell);
        let cursor = CursorOverlay::new(&mut stream);
        let grid = CellGrid::new(rows, cols, DefaultColors::from_config(config));
        log::info!(
            "Frame driver ready: {}x{} grid, cell {}x{}, atlas {}x{}",
            rows,
            cols,
            cell.width,
            cell.height,
            glyphs.atlas.width(),
            glyphs.atlas.height()
        );

        Self {
            grid,
            stream,
            glyphs,
            cursor,
            backend,
            queue,
            state: FrameState::Dirty,
            stats: FrameStats::default(),
            viewport: (cols as u32 * cell.width, rows as u32 * cell.height),
            needs_present: true,
            row_scratch: Vec::new(),
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn stream(&self) -> &VertexStream {
        &self.stream
    }

    pub fn glyphs(&self) -> &GlyphContext<R> {
        &self.glyphs
    }

    pub fn cursor(&self) -> &CursorOverlay {
        &self.cursor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    pub fn cell_size(&self) -> CellSize {
        self.stream.cell_size()
    }

    /// Grid size that fits the current viewport.
    pub fn fitting_grid_size(&self) -> (usize, usize) {
        let cell = self.cell_size();
        let rows = (self.viewport.1 / cell.height.max(1)).max(1);
        let cols = (self.viewport.0 / cell.width.max(1)).max(1);
        (rows as usize, cols as usize)
    }

    /// The surface changed size. Returns the `(rows, cols)` that now fit,
    /// for the caller to request from the editor.
    pub fn resize_viewport(&mut self, width: u32, height: u32) -> (usize, usize) {
        self.backend.resize(width, height);
        self.viewport = (width.max(1), height.max(1));
        self.needs_present = true;
        self.fitting_grid_size()
    }

    /// Drain the queue, repaint damage, upload and present.
    ///
    /// Returns whether a frame was presented.
    pub fn render_frame(&mut self) -> Result<bool, RenderError> {
        self.process_events();
        if self.state == FrameState::Dirty || self.grid.any_dirty() {
            self.scan();
        }
        if self.state != FrameState::RenderPending && !self.needs_present {
            if self.state == FrameState::Presented {
                self.state = FrameState::Idle;
            }
            return Ok(false);
        }

        let uniforms = FrameUniforms {
            viewport_size: [self.viewport.0 as f32, self.viewport.1 as f32],
            atlas_size: [
                self.glyphs.atlas.width() as f32,
                self.glyphs.atlas.height() as f32,
            ],
            undercurl_rect: self.stream.undercurl_rect(),
        };
        let frame = FrameUpload {
            atlas: self.glyphs.atlas.take_upload(),
            instance_count: self.stream.len() as u32,
            vertices: self.stream.take_upload(),
            uniforms,
            clear_color: self.grid.defaults().background.to_f32_a(1.0),
        };
        if let Err(e) = self.backend.render(frame) {
            // Uploads taken for this frame never reached the GPU.
            self.stream.invalidate_upload();
            self.glyphs.atlas.invalidate_upload();
            return Err(e);
        }

        self.needs_present = false;
        self.state = FrameState::Presented;
        self.stats.frames_presented += 1;
        self.stats.atlas_generation = self.glyphs.atlas.generation();
        self.stats.atlas_fill = self.glyphs.atlas.fill();
        log::trace!("Frame presented: {:?}", self.stats);
        Ok(true)
    }

    /// Apply every sealed batch from the queue. Returns whether any arrived.
    pub fn process_events(&mut self) -> bool {
        if !self.queue.has_pending() {
            return false;
        }
        let batches = self.queue.drain();
        for batch in &batches {
            for event in batch {
                self.apply_event(event);
            }
        }
        !batches.is_empty()
    }

    /// Apply one update. Protocol errors are logged and the update skipped.
    pub fn apply_event(&mut self, event: &RedrawEvent) {
        if let Err(e) = self.try_apply_event(event) {
            log::error!("Dropped editor update {:?}: {}", event, e);
        }
    }

    fn try_apply_event(&mut self, event: &RedrawEvent) -> Result<(), GridError> {
        match event {
            RedrawEvent::GridResize { rows, cols } => {
                self.grid.resize(*rows, *cols);
                self.stream.resize(*rows, *cols);
                self.cursor.mark_dirty();
            }
            RedrawEvent::DefaultColors {
                foreground,
                background,
                special,
            } => {
                self.grid.set_default_colors(DefaultColors {
                    foreground: *foreground,
                    background: *background,
                    special: *special,
                });
            }
            RedrawEvent::HighlightDefine { id, attr } => {
                self.grid.define_highlight(*id, *attr);
            }
            RedrawEvent::Line {
                row,
                col_start,
                cells,
            } => {
                self.grid.set_line(*row, *col_start, cells)?;
            }
            RedrawEvent::Clear => self.grid.clear(),
            RedrawEvent::Scroll {
                top,
                bottom,
                left,
                right,
                rows,
            } => {
                let region = ScrollRegion::new(*top, *bottom, *left, *right);
                let stream = &mut self.stream;
                let mut split = Vec::new();
                self.grid.scroll(region, *rows, |dst, src, left, right| {
                    if stream.copy_row_range(dst, src, left, right) {
                        split.push(dst);
                    }
                })?;
                // Wide glyphs cut by the region edge need their spills redrawn.
                for row in split {
                    self.grid.mark_row_dirty(row);
                }
                self.cursor.mark_dirty();
            }
            RedrawEvent::CursorGoto { row, col } => self.cursor.move_to(*row, *col),
            RedrawEvent::CursorShape(shape) => self.cursor.set_shape(*shape),
            RedrawEvent::Flush => {}
        }
        self.state = FrameState::Dirty;
        Ok(())
    }

    /// Rewrite the records of every dirty row and clear the flags.
    ///
    /// An atlas reset during the scan invalidates rectangles already written,
    /// so every row is marked dirty and the scan repeats.
    pub fn scan(&mut self) -> usize {
        let mut cells = 0;
        let mut glyph_cells = 0;
        let mut rows = 0;
        let mut passes = 0;

        loop {
            let dirty: Vec<usize> = self.grid.dirty_rows().collect();
            for row in dirty {
                self.grid.row_draws(row, &mut self.row_scratch);
                self.stream.write_row(row, &self.row_scratch, &mut self.glyphs);
                glyph_cells += self.row_scratch.iter().filter(|d| !d.is_empty()).count();
                cells += self.row_scratch.len();
                rows += 1;
                self.grid.clear_row_dirty(row);
            }

            if !self.glyphs.atlas.take_invalidated() {
                break;
            }
            if passes == MAX_RESCANS {
                log::warn!(
                    "Glyph atlas reset {} times in one frame; visible glyphs may exceed its capacity",
                    passes + 1
                );
                break;
            }
            log::debug!("Atlas generation {} during scan, repainting", self.glyphs.atlas.generation());
            self.grid.mark_all_dirty();
            passes += 1;
        }

        if cells > 0 {
            self.cursor.mark_dirty();
        }
        if self.cursor.is_dirty() {
            self.cursor.redraw(&mut self.stream, &self.grid, &mut self.glyphs);
            // A cursor glyph can reset the atlas too.
            if self.glyphs.atlas.take_invalidated() {
                self.grid.mark_all_dirty();
                self.cursor.mark_dirty();
            }
        }

        self.stats.cells_redrawn = cells;
        self.stats.glyph_cells = glyph_cells;
        self.stats.rows_redrawn = rows;
        self.state = FrameState::RenderPending;
        log::debug!("Damage scan: {} rows, {} cells ({} glyphs)", rows, cells, glyph_cells);
        cells
    }

    /// Change the rasterizer with `change`, then reset the atlas and repaint
    /// everything. On failure the previous font stays active.
    pub fn reconfigure_glyphs<F>(&mut self, change: F) -> Result<(), FontError>
    where
        F: FnOnce(&mut R) -> Result<(), FontError>,
    {
        if let Err(e) = change(&mut self.glyphs.rasterizer) {
            log::error!("Font change failed, keeping current font: {}", e);
            return Err(e);
        }
        self.reset_glyphs();
        Ok(())
    }

    fn reset_glyphs(&mut self) {
        self.glyphs.reset();
        self.glyphs.atlas.take_invalidated();
        self.stream.set_cell_size(self.glyphs.cell_size());
        self.grid.mark_all_dirty();
        self.cursor.mark_dirty();
        self.state = FrameState::Dirty;
        let cell = self.cell_size();
        log::info!("Glyphs reconfigured, cell {}x{}", cell.width, cell.height);
    }
}

impl<B: RenderBackend> FrameDriver<B, FontRasterizer> {
    pub fn set_font(&mut self, family_or_path: &str, size_pt: f32, dpi: f32) -> Result<(), FontError> {
        self.reconfigure_glyphs(|r| r.set_font(family_or_path, size_pt, dpi))
    }

    pub fn set_font_size(&mut self, size_pt: f32) -> Result<(), FontError> {
        self.reconfigure_glyphs(|r| r.set_font_size(size_pt))
    }

    /// The window moved to a display with a different scale factor.
    pub fn set_dpi(&mut self, dpi: f32) -> Result<(), FontError> {
        self.reconfigure_glyphs(|r| r.set_dpi(dpi))
    }

    pub fn set_box_drawing_enabled(&mut self, enabled: bool) {
        self.glyphs.rasterizer.set_box_drawing(enabled);
        self.reset_glyphs();
    }
}
