//! Procedural decorations: underline, strikethrough, undercurl and the
//! unsupported-glyph placeholder.

use super::{Canvas, CellSize, GlyphStyle};

/// Row of the 1px underline: just below the baseline, clamped inside the cell.
pub fn underline_row(cell: CellSize) -> u32 {
    (cell.baseline + 1).min(cell.height.saturating_sub(1))
}

/// Row of the 1px strikethrough: a third of the ascent above the baseline.
pub fn strikethrough_row(cell: CellSize) -> u32 {
    let row = cell.baseline.saturating_sub(cell.baseline / 3);
    row.min(cell.height.saturating_sub(1))
}

/// Composite the requested line decorations across the full canvas width.
pub fn apply_lines(canvas: &mut Canvas, style: GlyphStyle, cell: CellSize) {
    if style.underline {
        canvas.hline(underline_row(cell));
    }
    if style.strikethrough {
        canvas.hline(strikethrough_row(cell));
    }
}

/// The undercurl: one sine period (a crest and a trough) spanning the cell,
/// centred a little below the baseline.
pub fn undercurl(cell: CellSize) -> Canvas {
    let mut canvas = Canvas::new(cell.width, cell.height);
    if cell.width == 0 || cell.height == 0 {
        return canvas;
    }

    let below = cell.height.saturating_sub(cell.baseline).max(2) as f32;
    let amplitude = (below / 4.0).clamp(1.0, 3.0);
    let max_center = cell.height as f32 - amplitude - 1.0;
    let center = (cell.baseline as f32 + amplitude + 0.5).min(max_center).max(amplitude);

    let curve = |x: f32| {
        let phase = x / cell.width as f32 * std::f32::consts::TAU;
        center - amplitude * phase.sin()
    };

    // Fill the vertical span between neighbouring samples so steep parts of
    // the curve stay connected.
    let mut prev = curve(0.5);
    for x in 0..cell.width {
        let y = curve(x as f32 + 0.5);
        let lo = prev.min(y).round() as i32;
        let hi = prev.max(y).round() as i32;
        for py in lo..=hi {
            canvas.plot(x as i32, py, 255);
        }
        prev = y;
    }
    canvas
}

/// Hollow box drawn in place of glyphs that no face provides.
pub fn unsupported(cell: CellSize) -> Canvas {
    let mut canvas = Canvas::new(cell.width, cell.height);
    if cell.width < 3 || cell.height < 3 {
        canvas.fill_rect(0, 0, cell.width as i32, cell.height as i32, 255);
        return canvas;
    }

    let left = 1;
    let right = cell.width as i32 - 1;
    let top = (cell.height / 6).max(1) as i32;
    let bottom = (cell.baseline as i32).clamp(top + 2, cell.height as i32 - 1);

    canvas.fill_rect(left, top, right, top + 1, 255);
    canvas.fill_rect(left, bottom - 1, right, bottom, 255);
    canvas.fill_rect(left, top, left + 1, bottom, 255);
    canvas.fill_rect(right - 1, top, right, bottom, 255);
    canvas
}
