//! Frame lifecycle and counters.

/// Where the driver is between two presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    /// Nothing changed since the last present.
    #[default]
    Idle,
    /// The grid changed; rows await the damage scan.
    Dirty,
    /// Records or atlas texels await upload and a draw.
    RenderPending,
    /// The last frame was drawn and presented.
    Presented,
}

/// Counters surfaced in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub frames_presented: u64,
    /// Cells rewritten by the last damage scan
    pub cells_redrawn: usize,
    /// Of those, cells that drew a glyph
    pub glyph_cells: usize,
    pub rows_redrawn: usize,
    pub atlas_generation: u64,
    /// Atlas shelf usage, `0.0..=1.0`
    pub atlas_fill: f32,
}
