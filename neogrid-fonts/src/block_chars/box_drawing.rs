//! Box drawing character rendering (U+2500–U+257F).
//!
//! Every character is described by the weight of its four arms (left, right,
//! up, down). Arms run from the cell edge to the junction, where they extend
//! across the perpendicular strokes so corners and tees close without gaps.

use crate::rasterizer::Canvas;

/// Stroke proportions, as fractions of the smaller cell dimension.
mod grid {
    pub const LIGHT_THICKNESS: f32 = 0.12;
    pub const HEAVY_THICKNESS: f32 = 0.20;
    /// Gap between the two strokes of a double line
    pub const DOUBLE_GAP: f32 = 0.125;
    /// Fraction of each dash period that is inked
    pub const DASH_FILL: f32 = 0.6;
}

/// Line weight of one arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    None,
    Light,
    Heavy,
    Double,
}

const N: u8 = 0;
const L: u8 = 1;
const H: u8 = 2;
const D: u8 = 3;

/// Arms for U+2500..=U+257F: `[left, right, up, down]`.
///
/// Rounded corners (U+256D–U+2570) are drawn as square corners. Diagonals
/// (U+2571–U+2573) have no arms and are drawn separately.
#[rustfmt::skip]
const ARMS: [[u8; 4]; 128] = [
    // 2500 ─ ━ │ ┃ ┄ ┅ ┆ ┇ ┈ ┉ ┊ ┋ ┌ ┍ ┎ ┏
    [L, L, N, N], [H, H, N, N], [N, N, L, L], [N, N, H, H],
    [L, L, N, N], [H, H, N, N], [N, N, L, L], [N, N, H, H],
    [L, L, N, N], [H, H, N, N], [N, N, L, L], [N, N, H, H],
    [N, L, N, L], [N, H, N, L], [N, L, N, H], [N, H, N, H],
    // 2510 ┐ ┑ ┒ ┓ └ ┕ ┖ ┗ ┘ ┙ ┚ ┛ ├ ┝ ┞ ┟
    [L, N, N, L], [H, N, N, L], [L, N, N, H], [H, N, N, H],
    [N, L, L, N], [N, H, L, N], [N, L, H, N], [N, H, H, N],
    [L, N, L, N], [H, N, L, N], [L, N, H, N], [H, N, H, N],
    [N, L, L, L], [N, H, L, L], [N, L, H, L], [N, L, L, H],
    // 2520 ┠ ┡ ┢ ┣ ┤ ┥ ┦ ┧ ┨ ┩ ┪ ┫ ┬ ┭ ┮ ┯
    [N, L, H, H], [N, H, H, L], [N, H, L, H], [N, H, H, H],
    [L, N, L, L], [H, N, L, L], [L, N, H, L], [L, N, L, H],
    [L, N, H, H], [H, N, H, L], [H, N, L, H], [H, N, H, H],
    [L, L, N, L], [H, L, N, L], [L, H, N, L], [H, H, N, L],
    // 2530 ┰ ┱ ┲ ┳ ┴ ┵ ┶ ┷ ┸ ┹ ┺ ┻ ┼ ┽ ┾ ┿
    [L, L, N, H], [H, L, N, H], [L, H, N, H], [H, H, N, H],
    [L, L, L, N], [H, L, L, N], [L, H, L, N], [H, H, L, N],
    [L, L, H, N], [H, L, H, N], [L, H, H, N], [H, H, H, N],
    [L, L, L, L], [H, L, L, L], [L, H, L, L], [H, H, L, L],
    // 2540 ╀ ╁ ╂ ╃ ╄ ╅ ╆ ╇ ╈ ╉ ╊ ╋ ╌ ╍ ╎ ╏
    [L, L, H, L], [L, L, L, H], [L, L, H, H], [H, L, H, L],
    [L, H, H, L], [H, L, L, H], [L, H, L, H], [H, H, H, L],
    [H, H, L, H], [H, L, H, H], [L, H, H, H], [H, H, H, H],
    [L, L, N, N], [H, H, N, N], [N, N, L, L], [N, N, H, H],
    // 2550 ═ ║ ╒ ╓ ╔ ╕ ╖ ╗ ╘ ╙ ╚ ╛ ╜ ╝ ╞ ╟
    [D, D, N, N], [N, N, D, D], [N, D, N, L], [N, L, N, D],
    [N, D, N, D], [D, N, N, L], [L, N, N, D], [D, N, N, D],
    [N, D, L, N], [N, L, D, N], [N, D, D, N], [D, N, L, N],
    [L, N, D, N], [D, N, D, N], [N, D, L, L], [N, L, D, D],
    // 2560 ╠ ╡ ╢ ╣ ╤ ╥ ╦ ╧ ╨ ╩ ╪ ╫ ╬ ╭ ╮ ╯
    [N, D, D, D], [D, N, L, L], [L, N, D, D], [D, N, D, D],
    [D, D, N, L], [L, L, N, D], [D, D, N, D], [D, D, L, N],
    [L, L, D, N], [D, D, D, N], [D, D, L, L], [L, L, D, D],
    [D, D, D, D], [N, L, N, L], [L, N, N, L], [L, N, L, N],
    // 2570 ╰ ╱ ╲ ╳ ╴ ╵ ╶ ╷ ╸ ╹ ╺ ╻ ╼ ╽ ╾ ╿
    [N, L, L, N], [N, N, N, N], [N, N, N, N], [N, N, N, N],
    [L, N, N, N], [N, N, L, N], [N, L, N, N], [N, N, N, L],
    [H, N, N, N], [N, N, H, N], [N, H, N, N], [N, N, N, H],
    [L, H, N, N], [N, N, L, H], [H, L, N, N], [N, N, H, L],
];

fn weight(byte: u8) -> Weight {
    match byte {
        L => Weight::Light,
        H => Weight::Heavy,
        D => Weight::Double,
        _ => Weight::None,
    }
}

/// Arm weights `[left, right, up, down]` of a box drawing character.
pub fn box_arms(ch: char) -> Option<[Weight; 4]> {
    let idx = (ch as u32).checked_sub(0x2500)? as usize;
    let row = ARMS.get(idx)?;
    Some([weight(row[0]), weight(row[1]), weight(row[2]), weight(row[3])])
}

/// Number of dashes for the dashed line characters, 0 for solid lines.
fn dash_count(ch: char) -> u32 {
    match ch {
        '\u{2504}'..='\u{2507}' => 3,
        '\u{2508}'..='\u{250B}' => 4,
        '\u{254C}'..='\u{254F}' => 2,
        _ => 0,
    }
}

/// Pixel thicknesses for one cell size.
#[derive(Debug, Clone, Copy)]
struct Strokes {
    light: i32,
    heavy: i32,
    gap: i32,
}

impl Strokes {
    fn for_cell(width: u32, height: u32) -> Self {
        let base = width.min(height) as f32;
        let light = (base * grid::LIGHT_THICKNESS).round().max(1.0) as i32;
        let heavy = ((base * grid::HEAVY_THICKNESS).round() as i32).max(light + 1);
        let gap = ((base * grid::DOUBLE_GAP).round() as i32).max(1);
        Self { light, heavy, gap }
    }

    /// Half-open spans across the stroke direction, centred on `center`.
    fn spans(&self, weight: Weight, center: i32) -> Vec<(i32, i32)> {
        match weight {
            Weight::None => Vec::new(),
            Weight::Light => vec![centered(center, self.light)],
            Weight::Heavy => vec![centered(center, self.heavy)],
            Weight::Double => {
                let (start, end) = centered(center, 2 * self.light + self.gap);
                vec![(start, start + self.light), (end - self.light, end)]
            }
        }
    }

    /// Outer extent of the strokes of `a` and `b` together.
    fn extent(&self, a: Weight, b: Weight, center: i32) -> Option<(i32, i32)> {
        let spans = self
            .spans(a, center)
            .into_iter()
            .chain(self.spans(b, center));
        spans.fold(None, |acc, (s, e)| match acc {
            None => Some((s, e)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(e))),
        })
    }
}

fn centered(center: i32, thickness: i32) -> (i32, i32) {
    let start = center - thickness / 2;
    (start, start + thickness)
}

/// Draw a box drawing character onto a one-cell canvas.
///
/// Returns `false` if `ch` is outside U+2500–U+257F.
pub fn draw_box_drawing(ch: char, canvas: &mut Canvas) -> bool {
    if matches!(ch, '\u{2571}'..='\u{2573}') {
        draw_diagonal(ch, canvas);
        return true;
    }
    let Some([left, right, up, down]) = box_arms(ch) else {
        return false;
    };

    let w = canvas.width() as i32;
    let h = canvas.height() as i32;
    let cx = w / 2;
    let cy = h / 2;
    let strokes = Strokes::for_cell(canvas.width(), canvas.height());

    let dashes = dash_count(ch);
    if dashes > 0 {
        draw_dashed(canvas, &strokes, [left, right, up, down], dashes);
        return true;
    }

    // Horizontal arms reach across the vertical strokes and vice versa
    let vertical = strokes.extent(up, down, cx);
    let horizontal = strokes.extent(left, right, cy);

    let left_end = vertical.map_or(cx, |(_, hi)| hi);
    let right_start = vertical.map_or(cx, |(lo, _)| lo);
    let up_end = horizontal.map_or(cy, |(_, hi)| hi);
    let down_start = horizontal.map_or(cy, |(lo, _)| lo);

    for (y0, y1) in strokes.spans(left, cy) {
        canvas.fill_rect(0, y0, left_end, y1, 255);
    }
    for (y0, y1) in strokes.spans(right, cy) {
        canvas.fill_rect(right_start, y0, w, y1, 255);
    }
    for (x0, x1) in strokes.spans(up, cx) {
        canvas.fill_rect(x0, 0, x1, up_end, 255);
    }
    for (x0, x1) in strokes.spans(down, cx) {
        canvas.fill_rect(x0, down_start, x1, h, 255);
    }
    true
}

fn draw_dashed(canvas: &mut Canvas, strokes: &Strokes, arms: [Weight; 4], dashes: u32) {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let [left, _, up, _] = arms;
    let horizontal = left != Weight::None;
    let (length, weight) = if horizontal { (w, left) } else { (h, up) };
    let period = length / dashes as f32;

    for i in 0..dashes {
        let start = (i as f32 * period).round() as i32;
        let end = ((i as f32 + grid::DASH_FILL) * period).round().max(start as f32 + 1.0) as i32;
        if horizontal {
            for (y0, y1) in strokes.spans(weight, canvas.height() as i32 / 2) {
                canvas.fill_rect(start, y0, end, y1, 255);
            }
        } else {
            for (x0, x1) in strokes.spans(weight, canvas.width() as i32 / 2) {
                canvas.fill_rect(x0, start, x1, end, 255);
            }
        }
    }
}

/// ╱ ╲ ╳ by per-pixel distance to the corner-to-corner lines.
fn draw_diagonal(ch: char, canvas: &mut Canvas) {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let strokes = Strokes::for_cell(canvas.width(), canvas.height());
    let half = strokes.light as f32 / 2.0;
    let length = (w * w + h * h).sqrt();

    let rising = matches!(ch, '\u{2571}' | '\u{2573}');
    let falling = matches!(ch, '\u{2572}' | '\u{2573}');

    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let mut distance = f32::MAX;
            if rising {
                // Line from (w, 0) to (0, h)
                distance = distance.min((h * px + w * py - w * h).abs() / length);
            }
            if falling {
                // Line from (0, 0) to (w, h)
                distance = distance.min((h * px - w * py).abs() / length);
            }
            let coverage = (half + 0.5 - distance).clamp(0.0, 1.0);
            if coverage > 0.0 {
                canvas.plot(x as i32, y as i32, (coverage * 255.0).round() as u8);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> Canvas {
        Canvas::new(8, 16)
    }

    #[test]
    fn test_table_covers_range() {
        assert_eq!(ARMS.len(), 0x80);
        assert_eq!(box_arms('─'), Some([Weight::Light, Weight::Light, Weight::None, Weight::None]));
        assert_eq!(box_arms('╬'), Some([Weight::Double; 4]));
        assert_eq!(box_arms('╿'), Some([Weight::None, Weight::None, Weight::Heavy, Weight::Light]));
        assert_eq!(box_arms('A'), None);
    }

    #[test]
    fn test_horizontal_line_spans_cell() {
        let mut canvas = cell();
        assert!(draw_box_drawing('─', &mut canvas));
        for x in 0..8 {
            assert_eq!(canvas.get(x, 8), 255, "gap at x={x}");
        }
        assert_eq!(canvas.get(4, 0), 0);
        assert_eq!(canvas.get(4, 15), 0);
    }

    #[test]
    fn test_vertical_line_spans_cell() {
        let mut canvas = cell();
        assert!(draw_box_drawing('│', &mut canvas));
        for y in 0..16 {
            assert_eq!(canvas.get(4, y), 255, "gap at y={y}");
        }
        assert_eq!(canvas.get(0, 8), 0);
    }

    #[test]
    fn test_heavy_is_thicker_than_light() {
        let mut light = cell();
        let mut heavy = cell();
        draw_box_drawing('─', &mut light);
        draw_box_drawing('━', &mut heavy);
        let rows = |c: &Canvas| (0..16).filter(|&y| c.get(0, y) > 0).count();
        assert!(rows(&heavy) > rows(&light));
    }

    #[test]
    fn test_corner_is_closed() {
        let mut canvas = cell();
        draw_box_drawing('┌', &mut canvas);
        // Junction pixel is inked, nothing to the left or above it
        assert_eq!(canvas.get(4, 8), 255);
        assert_eq!(canvas.get(0, 8), 0);
        assert_eq!(canvas.get(4, 0), 0);
        assert_eq!(canvas.get(7, 8), 255);
        assert_eq!(canvas.get(4, 15), 255);
    }

    #[test]
    fn test_rounded_corner_matches_square_corner() {
        let mut rounded = cell();
        let mut square = cell();
        draw_box_drawing('╭', &mut rounded);
        draw_box_drawing('┌', &mut square);
        assert_eq!(rounded.into_image(), square.into_image());
    }

    #[test]
    fn test_double_line_has_two_strokes() {
        let mut canvas = cell();
        draw_box_drawing('═', &mut canvas);
        let inked: Vec<u32> = (0..16).filter(|&y| canvas.get(0, y) > 0).collect();
        assert_eq!(inked.len(), 2);
        assert!(inked[1] - inked[0] > 1, "strokes must be separated");
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut canvas = Canvas::new(12, 16);
        draw_box_drawing('┄', &mut canvas);
        let inked = (0..12).filter(|&x| canvas.get(x, 8) > 0).count();
        assert!(inked > 0 && inked < 12);
    }

    #[test]
    fn test_diagonal_touches_corners() {
        let mut canvas = cell();
        draw_box_drawing('╲', &mut canvas);
        assert!(canvas.get(0, 0) > 0);
        assert!(canvas.get(7, 15) > 0);
        assert_eq!(canvas.get(7, 0), 0);

        let mut cross = cell();
        draw_box_drawing('╳', &mut cross);
        assert!(cross.get(7, 0) > 0 && cross.get(0, 0) > 0);
    }
}
