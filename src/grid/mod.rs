//! The authoritative character grid.
//!
//! Cells hold a character and a highlight id. Damage is tracked per row: any
//! write marks its row, and the frame driver clears the flag once the row's
//! vertex records have been rewritten.

mod cell;
mod error;
mod highlight;
mod scroll;

pub use cell::Cell;
pub use error::GridError;
pub use highlight::{DefaultColors, HighlightAttribute, HighlightTable};
pub use scroll::ScrollRegion;

use neogrid_render::CellDraw;

use crate::redraw::LineCell;

pub struct CellGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    dirty_rows: Vec<bool>,
    defaults: DefaultColors,
    highlights: HighlightTable,
}

impl CellGrid {
    /// A blank grid with every row dirty.
    pub fn new(rows: usize, cols: usize, defaults: DefaultColors) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::BLANK; rows * cols],
            dirty_rows: vec![true; rows],
            defaults,
            highlights: HighlightTable::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn defaults(&self) -> &DefaultColors {
        &self.defaults
    }

    pub fn highlights(&self) -> &HighlightTable {
        &self.highlights
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// The characters of `row`, empty cells skipped.
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.rows {
            return String::new();
        }
        self.cells[row * self.cols..(row + 1) * self.cols]
            .iter()
            .filter_map(|c| c.ch)
            .collect()
    }

    /// Replace the grid with a blank one of the new size, all rows dirty.
    ///
    /// The vertex stream must be resized to match before the next scan.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        log::debug!("Grid resized {}x{} -> {}x{}", self.rows, self.cols, rows, cols);
        self.rows = rows;
        self.cols = cols;
        self.cells = vec![Cell::BLANK; rows * cols];
        self.dirty_rows = vec![true; rows];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.mark_all_dirty();
    }

    pub fn set_default_colors(&mut self, defaults: DefaultColors) {
        self.defaults = defaults;
        self.mark_all_dirty();
    }

    /// Store a highlight definition. Colors may have changed anywhere, so
    /// every row is repainted.
    pub fn define_highlight(&mut self, id: u32, attr: HighlightAttribute) {
        if self.highlights.define(id, attr) {
            self.mark_all_dirty();
        }
    }

    pub fn set_cell(&mut self, row: usize, col: usize, ch: Option<char>, attr_id: u32) -> Result<(), GridError> {
        self.set_cells(row, col, ch, attr_id, 1)
    }

    /// Write `repeat` copies of one cell starting at `(row, col)`.
    pub fn set_cells(
        &mut self,
        row: usize,
        col: usize,
        ch: Option<char>,
        attr_id: u32,
        repeat: usize,
    ) -> Result<(), GridError> {
        self.check_span(row, col, repeat)?;
        let start = row * self.cols + col;
        self.cells[start..start + repeat].fill(Cell::new(ch, attr_id));
        self.dirty_rows[row] = true;
        Ok(())
    }

    /// Apply one editor line update.
    ///
    /// A cell without an id repeats the previous cell's id (0 at the start
    /// of the update); a cell without a count covers one column. The whole
    /// update is checked before any cell changes.
    pub fn set_line(&mut self, row: usize, col_start: usize, cells: &[LineCell]) -> Result<(), GridError> {
        let mut width = 0usize;
        for (i, cell) in cells.iter().enumerate() {
            match cell.repeat {
                Some(0) => {
                    return Err(GridError::MalformedLine(format!(
                        "cell {i} has a zero repeat count"
                    )));
                }
                Some(n) => width = width.saturating_add(n),
                None => width += 1,
            }
        }
        self.check_span(row, col_start, width)?;

        let mut col = row * self.cols + col_start;
        let mut attr_id = 0;
        for cell in cells {
            if let Some(id) = cell.attr_id {
                attr_id = id;
            }
            let repeat = cell.repeat.unwrap_or(1);
            self.cells[col..col + repeat].fill(Cell::new(cell.ch, attr_id));
            col += repeat;
        }
        self.dirty_rows[row] = true;
        Ok(())
    }

    /// Shift the cells of `region` by `rows` (up when positive).
    ///
    /// `on_row_copy(dst, src, left, right)` is called for every copied row in
    /// copy order so per-cell GPU records can follow. Rows vacated by the
    /// shift keep their old content until the editor redraws them.
    pub fn scroll<F>(&mut self, region: ScrollRegion, rows: isize, mut on_row_copy: F) -> Result<(), GridError>
    where
        F: FnMut(usize, usize, usize, usize),
    {
        self.check_defined()?;
        region.validate(self.rows, self.cols)?;
        let full_width = region.left == 0 && region.right == self.cols;

        for (dst, src) in region.row_copies(rows) {
            let from = src * self.cols;
            self.cells
                .copy_within(from + region.left..from + region.right, dst * self.cols + region.left);
            self.dirty_rows[dst] = if full_width {
                self.dirty_rows[src]
            } else {
                self.dirty_rows[dst] || self.dirty_rows[src]
            };
            on_row_copy(dst, src, region.left, region.right);
        }
        Ok(())
    }

    pub fn is_row_dirty(&self, row: usize) -> bool {
        self.dirty_rows.get(row).copied().unwrap_or(false)
    }

    /// Damage is tracked per row; a cell is dirty when its row is.
    pub fn is_cell_dirty(&self, row: usize, col: usize) -> bool {
        col < self.cols && self.is_row_dirty(row)
    }

    pub fn any_dirty(&self) -> bool {
        self.dirty_rows.iter().any(|&d| d)
    }

    pub fn dirty_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.dirty_rows
            .iter()
            .enumerate()
            .filter_map(|(row, &dirty)| dirty.then_some(row))
    }

    pub fn mark_row_dirty(&mut self, row: usize) {
        if let Some(flag) = self.dirty_rows.get_mut(row) {
            *flag = true;
        }
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty_rows.fill(true);
    }

    pub fn clear_row_dirty(&mut self, row: usize) {
        if let Some(flag) = self.dirty_rows.get_mut(row) {
            *flag = false;
        }
    }

    pub fn cell_draw(&self, row: usize, col: usize) -> Option<CellDraw> {
        self.cell(row, col)
            .map(|cell| self.highlights.cell_draw(cell, &self.defaults))
    }

    /// Fill `out` with the draw parameters of every cell in `row`.
    pub fn row_draws(&self, row: usize, out: &mut Vec<CellDraw>) {
        out.clear();
        if row >= self.rows {
            return;
        }
        out.extend(
            self.cells[row * self.cols..(row + 1) * self.cols]
                .iter()
                .map(|cell| self.highlights.cell_draw(cell, &self.defaults)),
        );
    }

    fn check_defined(&self) -> Result<(), GridError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GridError::Undefined {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    fn check_span(&self, row: usize, col: usize, width: usize) -> Result<(), GridError> {
        self.check_defined()?;
        if row >= self.rows {
            return Err(GridError::RowOutOfRange { row, rows: self.rows });
        }
        let end = col.saturating_add(width);
        if col >= self.cols || end > self.cols {
            return Err(GridError::ColumnOutOfRange {
                start: col,
                end,
                cols: self.cols,
            });
        }
        Ok(())
    }
}
