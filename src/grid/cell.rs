//! A single grid cell.

/// Character plus highlight id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// `None` for the empty cell that follows a wide glyph.
    pub ch: Option<char>,
    /// Highlight id; 0 uses the grid defaults.
    pub attr_id: u32,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: Some(' '),
        attr_id: 0,
    };

    pub const fn new(ch: Option<char>, attr_id: u32) -> Self {
        Self { ch, attr_id }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::BLANK
    }
}
