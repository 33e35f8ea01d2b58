// Library exports for the demo binary and integration tests.
//
// Crate layout:
//   - `grid`          the authoritative cell grid, highlight table and scroll copies
//   - `redraw`        typed editor updates
//   - `event_queue`   batch hand-off from the I/O side to the render tick
//   - `cursor`        cursor overlay in a reserved vertex record
//   - `frame_driver`  per-tick orchestration over a `RenderBackend`
//
// Glyph rasterization lives in `neogrid-fonts`; the atlas, vertex stream and
// wgpu backend in `neogrid-render`.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod cli;
pub mod cursor;
pub mod debug;
pub mod demo;
pub mod event_queue;
pub mod frame_driver;
pub mod grid;
pub mod redraw;

pub use event_queue::EventQueue;
pub use frame_driver::{FrameDriver, FrameState, FrameStats};
pub use grid::{Cell, CellGrid, DefaultColors, GridError, HighlightAttribute, HighlightTable, ScrollRegion};
pub use redraw::{CursorShape, LineCell, RedrawEvent};
