//! Typed editor updates.
//!
//! Whatever transport carries the editor's redraw notifications decodes them
//! into these variants before they reach the grid; nothing past this point
//! sees dynamically typed payloads.

use neogrid_config::Rgb;

use crate::grid::HighlightAttribute;

/// One entry of a line update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCell {
    /// `None` is the empty cell that follows a wide glyph.
    pub ch: Option<char>,
    /// Omitted ids repeat the previous cell's id in the same update.
    pub attr_id: Option<u32>,
    /// Omitted counts mean one cell.
    pub repeat: Option<usize>,
}

impl LineCell {
    pub fn new(ch: char) -> Self {
        Self {
            ch: Some(ch),
            attr_id: None,
            repeat: None,
        }
    }

    /// The empty right half of a wide glyph.
    pub fn empty() -> Self {
        Self {
            ch: None,
            attr_id: None,
            repeat: None,
        }
    }

    pub fn with_attr(mut self, attr_id: u32) -> Self {
        self.attr_id = Some(attr_id);
        self
    }

    pub fn repeated(mut self, count: usize) -> Self {
        self.repeat = Some(count);
        self
    }
}

/// Cursor appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Block,
    /// A bar at the left edge, `percentage` of the cell width
    Vertical { percentage: u8 },
    /// A bar at the bottom edge, `percentage` of the cell height
    Horizontal { percentage: u8 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RedrawEvent {
    GridResize {
        rows: usize,
        cols: usize,
    },
    DefaultColors {
        foreground: Rgb,
        background: Rgb,
        special: Rgb,
    },
    HighlightDefine {
        id: u32,
        attr: HighlightAttribute,
    },
    Line {
        row: usize,
        col_start: usize,
        cells: Vec<LineCell>,
    },
    Clear,
    /// Move the region `top..bottom` x `left..right` up by `rows` (down when
    /// negative).
    Scroll {
        top: usize,
        bottom: usize,
        left: usize,
        right: usize,
        rows: isize,
    },
    CursorGoto {
        row: usize,
        col: usize,
    },
    CursorShape(CursorShape),
    /// End of an atomic batch.
    Flush,
}

impl RedrawEvent {
    /// Convenience for the common single-attribute line update.
    pub fn line(row: usize, col_start: usize, text: &str, attr_id: u32) -> Self {
        let cells = text
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                let cell = LineCell::new(ch);
                if i == 0 { cell.with_attr(attr_id) } else { cell }
            })
            .collect();
        RedrawEvent::Line {
            row,
            col_start,
            cells,
        }
    }
}
