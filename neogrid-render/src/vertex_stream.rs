//! Per-cell GPU records kept in lock-step with the cell grid.
//!
//! The stream holds `rows * cols` grid records in row-major order followed by
//! overlay records handed out by [`VertexStream::reserve`]. Positions of grid
//! records are fixed by geometry; everything else is rewritten in place as
//! cells change. Touched grid and overlay records are tracked as separate
//! ranges and reported by [`VertexStream::take_upload`].

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use neogrid_fonts::{CellSize, GlyphRasterizer, GlyphStyle};

use crate::atlas::AtlasRect;
use crate::glyph_context::GlyphContext;
use crate::glyph_key::GlyphKey;

const NO_RECT: [f32; 4] = [0.0; 4];
const TRANSPARENT: [f32; 4] = [0.0; 4];

/// One instanced quad.
///
/// Rectangles are `[x, y, w, h]`: `position` in surface pixels, `tex1`/`tex2`
/// in atlas texels. A zero-width texture rectangle draws nothing, and
/// `sp[3] == 0` disables the undercurl.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CellVertex {
    pub position: [f32; 4],
    pub tex1: [f32; 4],
    pub tex2: [f32; 4],
    pub fg: [f32; 4],
    pub bg: [f32; 4],
    pub sp: [f32; 4],
}

/// What a single cell should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellDraw {
    /// `None` for an empty cell, e.g. the right half of a wide glyph.
    pub ch: Option<char>,
    pub style: GlyphStyle,
    pub undercurl: bool,
    pub fg: [f32; 4],
    pub bg: [f32; 4],
    pub sp: [f32; 4],
}

impl CellDraw {
    /// A cell showing nothing but `bg`.
    pub fn blank(bg: [f32; 4]) -> Self {
        Self {
            ch: None,
            style: GlyphStyle::PLAIN,
            undercurl: false,
            fg: TRANSPARENT,
            bg,
            sp: TRANSPARENT,
        }
    }

    /// Whether the cell draws only its background.
    pub fn is_empty(&self) -> bool {
        match self.ch {
            None => true,
            Some(' ') => !self.style.underline && !self.style.strikethrough && !self.undercurl,
            Some(_) => false,
        }
    }

    pub fn glyph_key(&self) -> Option<GlyphKey> {
        if self.is_empty() {
            return None;
        }
        self.ch.map(|ch| GlyphKey::new(ch, self.style))
    }
}

/// Atlas rectangles looked up for one cell before anything is written.
#[derive(Debug, Clone, Copy, Default)]
struct ResolvedCell {
    primary: Option<AtlasRect>,
    undercurl: Option<AtlasRect>,
}

/// A block of overlay records, addressed relative to the end of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedRange {
    start: usize,
    len: usize,
}

impl ReservedRange {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Bytes to write at `byte_offset` of the GPU vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadSpan<'a> {
    pub byte_offset: u64,
    pub bytes: &'a [u8],
}

/// Byte data the GPU vertex buffer needs.
#[derive(Debug, PartialEq)]
pub enum VertexUpload<'a> {
    None,
    /// Overwrite each span in place, grid records first.
    Partial(Vec<UploadSpan<'a>>),
    /// Reallocate the buffer to hold exactly `bytes`.
    Full { bytes: &'a [u8] },
}

pub struct VertexStream {
    rows: usize,
    cols: usize,
    cell: CellSize,
    records: Vec<CellVertex>,
    /// Per grid record: its glyph spills into the next column.
    wide: Vec<bool>,
    overlay_len: usize,
    undercurl_rect: [f32; 4],
    /// Touched grid records
    grid_dirty: Option<Range<usize>>,
    /// Touched overlay records, as absolute indices
    overlay_dirty: Option<Range<usize>>,
    /// Record count the GPU buffer was last sized for
    gpu_len: usize,
}

impl VertexStream {
    pub fn new(rows: usize, cols: usize, cell: CellSize) -> Self {
        let mut stream = Self {
            rows: 0,
            cols: 0,
            cell,
            records: Vec::new(),
            wide: Vec::new(),
            overlay_len: 0,
            undercurl_rect: NO_RECT,
            grid_dirty: None,
            overlay_dirty: None,
            gpu_len: 0,
        };
        stream.resize(rows, cols);
        stream
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell
    }

    /// Total records, overlays included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn grid_len(&self) -> usize {
        self.rows * self.cols
    }

    /// Atlas rectangle of the shared undercurl image.
    pub fn undercurl_rect(&self) -> [f32; 4] {
        self.undercurl_rect
    }

    pub fn record(&self, row: usize, col: usize) -> Option<&CellVertex> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.records.get(row * self.cols + col)
    }

    pub fn overlay_record(&self, range: ReservedRange, index: usize) -> Option<&CellVertex> {
        if index >= range.len {
            return None;
        }
        self.records.get(self.grid_len() + range.start + index)
    }

    /// Whether the glyph at `(row, col)` spills into the next column.
    pub fn is_wide(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.wide[row * self.cols + col]
    }

    pub fn records(&self) -> &[CellVertex] {
        &self.records
    }

    /// Reallocate the grid region for a new size. Grid records come back
    /// blank with fresh positions; overlay records are kept.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        let overlay = self.records.split_off(self.grid_len().min(self.records.len()));
        self.rows = rows;
        self.cols = cols;
        self.records = Vec::with_capacity(rows * cols + overlay.len());
        for row in 0..rows {
            for col in 0..cols {
                self.records.push(CellVertex {
                    position: self.position(row, col),
                    ..CellVertex::default()
                });
            }
        }
        self.records.extend(overlay);
        self.wide = vec![false; rows * cols];
        self.grid_dirty = Some(0..self.grid_len());
        self.overlay_dirty = Some(self.grid_len()..self.records.len());
        log::debug!("Vertex stream resized to {}x{} ({} records)", rows, cols, self.records.len());
    }

    /// Recompute every grid position for a new cell size.
    pub fn set_cell_size(&mut self, cell: CellSize) {
        self.cell = cell;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let position = self.position(row, col);
                self.records[row * self.cols + col].position = position;
            }
        }
        self.undercurl_rect = NO_RECT;
        self.touch(0..self.grid_len());
    }

    /// Bump-allocate `count` overlay records.
    pub fn reserve(&mut self, count: usize) -> ReservedRange {
        let range = ReservedRange {
            start: self.overlay_len,
            len: count,
        };
        self.overlay_len += count;
        self.records
            .resize(self.grid_len() + self.overlay_len, CellVertex::default());
        range
    }

    pub fn overlay(&mut self, range: ReservedRange) -> OverlayWriter<'_> {
        assert!(
            range.start + range.len <= self.overlay_len,
            "overlay range {range:?} was not reserved from this stream"
        );
        OverlayWriter {
            stream: self,
            range,
        }
    }

    /// Write one cell.
    ///
    /// `continuation` marks the cell as the right half of a wide glyph
    /// written by the previous column in the same pass, whose spill must
    /// survive this write.
    pub fn write_cell<R: GlyphRasterizer>(
        &mut self,
        row: usize,
        col: usize,
        draw: &CellDraw,
        continuation: bool,
        ctx: &mut GlyphContext<R>,
    ) {
        if row >= self.rows || col >= self.cols {
            log::error!(
                "write_cell({}, {}) outside {}x{} stream",
                row,
                col,
                self.rows,
                self.cols
            );
            return;
        }
        let resolved = Self::resolve(draw, ctx);
        self.apply(row, col, draw, resolved, continuation);
    }

    /// Write a row left to right: all glyphs are resolved first, then the
    /// records (and wide-glyph spills) are written.
    pub fn write_row<R: GlyphRasterizer>(
        &mut self,
        row: usize,
        draws: &[CellDraw],
        ctx: &mut GlyphContext<R>,
    ) {
        if row >= self.rows {
            log::error!("write_row({}) outside {} rows", row, self.rows);
            return;
        }
        let draws = &draws[..draws.len().min(self.cols)];
        let resolved: Vec<ResolvedCell> = draws.iter().map(|d| Self::resolve(d, ctx)).collect();

        let mut continuation = false;
        for (col, (draw, cell)) in draws.iter().zip(resolved).enumerate() {
            self.apply(row, col, draw, cell, continuation);
            continuation = self.wide[row * self.cols + col];
        }
    }

    /// Copy everything but positions from `src` to `dst` for columns
    /// `left..right`.
    ///
    /// Returns true when an edge of the range cuts through a wide glyph in
    /// either row. The copied spill then lacks its owner (or an owner lacks
    /// its spill), so `dst` has to be rewritten from its cells.
    pub fn copy_row_range(&mut self, dst: usize, src: usize, left: usize, right: usize) -> bool {
        let right = right.min(self.cols);
        if dst >= self.rows || src >= self.rows || left >= right {
            log::error!(
                "copy_row_range({}, {}, {}..{}) outside {}x{} stream",
                dst,
                src,
                left,
                right,
                self.rows,
                self.cols
            );
            return false;
        }
        let wide_at = |row: usize, col: usize| self.wide[row * self.cols + col];
        let split = (left > 0 && (wide_at(src, left - 1) || wide_at(dst, left - 1)))
            || wide_at(src, right - 1)
            || wide_at(dst, right - 1);

        for col in left..right {
            let s = src * self.cols + col;
            let d = dst * self.cols + col;
            let from = self.records[s];
            let to = &mut self.records[d];
            to.tex1 = from.tex1;
            to.tex2 = from.tex2;
            to.fg = from.fg;
            to.bg = from.bg;
            to.sp = from.sp;
            self.wide[d] = self.wide[s];
        }
        let base = dst * self.cols;
        self.touch(base + left..base + right);
        split
    }

    /// Bytes the GPU buffer needs since the previous call.
    pub fn take_upload(&mut self) -> VertexUpload<'_> {
        let size = std::mem::size_of::<CellVertex>();
        if self.records.len() != self.gpu_len {
            self.gpu_len = self.records.len();
            self.grid_dirty = None;
            self.overlay_dirty = None;
            if self.records.is_empty() {
                return VertexUpload::None;
            }
            return VertexUpload::Full {
                bytes: bytemuck::cast_slice(&self.records),
            };
        }
        let dirty = [self.grid_dirty.take(), self.overlay_dirty.take()];
        let spans: Vec<UploadSpan<'_>> = dirty
            .into_iter()
            .flatten()
            .filter(|range| !range.is_empty())
            .map(|range| UploadSpan {
                byte_offset: (range.start * size) as u64,
                bytes: bytemuck::cast_slice(&self.records[range]),
            })
            .collect();
        if spans.is_empty() {
            VertexUpload::None
        } else {
            VertexUpload::Partial(spans)
        }
    }

    /// The GPU copy is lost; the next upload sends every record.
    pub fn invalidate_upload(&mut self) {
        self.gpu_len = usize::MAX;
    }

    fn position(&self, row: usize, col: usize) -> [f32; 4] {
        let (w, h) = (self.cell.width as f32, self.cell.height as f32);
        [col as f32 * w, row as f32 * h, w, h]
    }

    fn touch(&mut self, range: Range<usize>) {
        let (len, grid_len) = (self.records.len(), self.grid_len());
        let end = range.end.min(len);
        merge(&mut self.grid_dirty, range.start.min(grid_len)..end.min(grid_len));
        merge(&mut self.overlay_dirty, range.start.max(grid_len)..end);
    }

    fn resolve<R: GlyphRasterizer>(draw: &CellDraw, ctx: &mut GlyphContext<R>) -> ResolvedCell {
        let Some(key) = draw.glyph_key() else {
            return ResolvedCell::default();
        };
        let undercurl = if draw.undercurl {
            ctx.resolve(GlyphKey::UNDERCURL)
        } else {
            None
        };
        ResolvedCell {
            primary: ctx.resolve(key),
            undercurl,
        }
    }

    fn apply(
        &mut self,
        row: usize,
        col: usize,
        draw: &CellDraw,
        resolved: ResolvedCell,
        continuation: bool,
    ) {
        let idx = row * self.cols + col;
        let next = (col + 1 < self.cols).then_some(idx + 1);
        let was_wide = std::mem::replace(&mut self.wide[idx], false);
        self.records[idx].bg = draw.bg;

        let primary = resolved.primary.filter(|r| !draw.is_empty() && !r.is_empty());
        let Some(rect) = primary else {
            let record = &mut self.records[idx];
            record.tex1 = NO_RECT;
            record.sp = TRANSPARENT;
            if !continuation {
                record.tex2 = NO_RECT;
            }
            self.clear_spill(was_wide, next);
            self.touch(idx..next.map_or(idx + 1, |n| n + 1));
            return;
        };

        self.records[idx].sp = match resolved.undercurl {
            Some(curl) => {
                self.undercurl_rect = curl.to_array();
                draw.sp
            }
            None => TRANSPARENT,
        };

        let mut tex1 = rect;
        if rect.width > self.cell.width {
            let half = rect.width / 2;
            tex1.width = half;
            if let Some(next) = next {
                let spill = AtlasRect::new(rect.x + half, rect.y, rect.width - half, rect.height);
                self.records[next].tex2 = spill.to_array();
                self.records[next].fg = draw.fg;
                self.wide[idx] = true;
            }
        } else {
            self.clear_spill(was_wide, next);
        }

        let record = &mut self.records[idx];
        record.tex1 = tex1.to_array();
        record.fg = draw.fg;
        if !continuation {
            record.tex2 = NO_RECT;
        }
        self.touch(idx..next.map_or(idx + 1, |n| n + 1));
    }

    fn clear_spill(&mut self, was_wide: bool, next: Option<usize>) {
        if let (true, Some(next)) = (was_wide, next) {
            self.records[next].tex2 = NO_RECT;
        }
    }
}

fn merge(dirty: &mut Option<Range<usize>>, range: Range<usize>) {
    if range.is_empty() {
        return;
    }
    *dirty = Some(match dirty.take() {
        Some(d) => d.start.min(range.start)..d.end.max(range.end),
        None => range,
    });
}

/// Write access to one reserved overlay range.
///
/// Indices are relative to the range and asserted against its length.
pub struct OverlayWriter<'a> {
    stream: &'a mut VertexStream,
    range: ReservedRange,
}

impl OverlayWriter<'_> {
    fn index(&self, i: usize) -> usize {
        assert!(
            i < self.range.len,
            "overlay index {i} outside reserved range of {}",
            self.range.len
        );
        self.stream.grid_len() + self.range.start + i
    }

    /// Apply `change` to record `i`, touching it only if it changed.
    fn update(&mut self, i: usize, change: impl FnOnce(&mut CellVertex)) {
        let idx = self.index(i);
        let before = self.stream.records[idx];
        change(&mut self.stream.records[idx]);
        if self.stream.records[idx] != before {
            self.stream.touch(idx..idx + 1);
        }
    }

    pub fn set_position(&mut self, i: usize, position: [f32; 4]) {
        self.update(i, |r| r.position = position);
    }

    pub fn set_primary_tex(&mut self, i: usize, rect: Option<AtlasRect>) {
        self.update(i, |r| r.tex1 = rect.map_or(NO_RECT, AtlasRect::to_array));
    }

    pub fn set_secondary_tex(&mut self, i: usize, rect: Option<AtlasRect>) {
        self.update(i, |r| r.tex2 = rect.map_or(NO_RECT, AtlasRect::to_array));
    }

    pub fn set_colors(&mut self, i: usize, fg: [f32; 4], bg: [f32; 4], sp: [f32; 4]) {
        self.update(i, |r| {
            r.fg = fg;
            r.bg = bg;
            r.sp = sp;
        });
    }

    /// Hide the record.
    pub fn clear(&mut self, i: usize) {
        self.update(i, |r| *r = CellVertex::default());
    }
}
