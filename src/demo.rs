//! Scripted editor session used by the demo window.
//!
//! Stands in for the editor process: it emits the same typed updates a real
//! editor connection would decode, through the same queue.

use std::sync::Arc;
use std::time::Duration;

use neogrid_config::Rgb;

use crate::event_queue::EventQueue;
use crate::grid::HighlightAttribute;
use crate::redraw::{CursorShape, LineCell, RedrawEvent};

const HL_TITLE: u32 = 1;
const HL_COMMENT: u32 = 2;
const HL_ERROR: u32 = 3;
const HL_STATUS: u32 = 4;
const HL_STRIKE: u32 = 5;

fn highlights() -> Vec<RedrawEvent> {
    let attrs = [
        (
            HL_TITLE,
            HighlightAttribute {
                foreground: Some(Rgb(0x61AFEF)),
                bold: true,
                ..Default::default()
            },
        ),
        (
            HL_COMMENT,
            HighlightAttribute {
                foreground: Some(Rgb(0x7F848E)),
                italic: true,
                ..Default::default()
            },
        ),
        (
            HL_ERROR,
            HighlightAttribute {
                special: Some(Rgb(0xE06C75)),
                undercurl: true,
                ..Default::default()
            },
        ),
        (
            HL_STATUS,
            HighlightAttribute {
                reverse: true,
                bold: true,
                ..Default::default()
            },
        ),
        (
            HL_STRIKE,
            HighlightAttribute {
                strikethrough: true,
                underline: true,
                ..Default::default()
            },
        ),
    ];
    attrs
        .into_iter()
        .map(|(id, attr)| RedrawEvent::HighlightDefine { id, attr })
        .collect()
}

/// Line cells for `text`, inserting the empty continuation cell after every
/// double-width character.
fn wide_line(text: &str, attr_id: u32) -> Vec<LineCell> {
    let mut cells = Vec::new();
    for (i, ch) in text.chars().enumerate() {
        let cell = LineCell::new(ch);
        cells.push(if i == 0 { cell.with_attr(attr_id) } else { cell });
        if is_double_width(ch) {
            cells.push(LineCell::empty());
        }
    }
    cells
}

fn is_double_width(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F | 0x2E80..=0x303E | 0x3041..=0x33FF | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFF00..=0xFF60
        | 0x1F300..=0x1F64F)
}

/// Cut `cells` so they cover at most `cols` columns.
fn fit(mut cells: Vec<LineCell>, cols: usize) -> Vec<LineCell> {
    cells.truncate(cols);
    if cells.last().is_some_and(|c| c.ch.is_some_and(is_double_width)) && cells.len() == cols {
        cells.pop();
    }
    cells
}

/// A full screen of sample content for a `rows` x `cols` grid, ending in a
/// flush.
pub fn welcome_screen(rows: usize, cols: usize) -> Vec<RedrawEvent> {
    let mut events = vec![
        RedrawEvent::GridResize { rows, cols },
        RedrawEvent::DefaultColors {
            foreground: Rgb(0xABB2BF),
            background: Rgb(0x282C34),
            special: Rgb(0xE06C75),
        },
    ];
    events.extend(highlights());
    events.push(RedrawEvent::Clear);

    let lines: [(&str, u32); 10] = [
        ("neogrid: glyph atlas, damage tracking, vertex streaming", HL_TITLE),
        ("-- rendered by a scripted editor session", HL_COMMENT),
        ("┌──────────┬──────────┐  ╔════╗  ┏━━━━┓", 0),
        ("│ box      │ drawing  │  ║ dbl║  ┃ hvy┃  ╱╲╳", 0),
        ("└──────────┴──────────┘  ╚════╝  ┗━━━━┛", 0),
        ("▁▂▃▄▅▆▇█ ▏▎▍▌▋▊▉ ░▒▓ ▖▗▘▙▚▛▜▝▞▟", 0),
        ("wide: 日本語のテキスト 한국어", 0),
        ("speling misteak under a curl", HL_ERROR),
        ("struck and underlined", HL_STRIKE),
        ("missing glyph: \u{10FFFD}", 0),
    ];
    for (row, (text, attr)) in lines.iter().enumerate().take(rows) {
        events.push(RedrawEvent::Line {
            row,
            col_start: 0,
            cells: fit(wide_line(text, *attr), cols),
        });
    }

    if rows > 1 {
        let status = format!("{:<width$}", " NORMAL  demo.txt", width = cols);
        events.push(RedrawEvent::Line {
            row: rows - 1,
            col_start: 0,
            cells: fit(wide_line(&status, HL_STATUS), cols),
        });
    }
    events.push(RedrawEvent::CursorShape(CursorShape::Block));
    events.push(RedrawEvent::CursorGoto { row: 1, col: 3 });
    events.push(RedrawEvent::Flush);
    events
}

/// One scroll step: the log region above the status line moves up a row and
/// a new line is written at its bottom.
pub fn scroll_step(rows: usize, cols: usize, tick: u64) -> Vec<RedrawEvent> {
    let first = 11.min(rows.saturating_sub(2));
    let bottom = rows.saturating_sub(1);
    if bottom <= first + 1 || cols == 0 {
        return vec![RedrawEvent::Flush];
    }
    let text = format!("tick {tick:>5}: scrolled region {first}..{bottom}");
    vec![
        RedrawEvent::Scroll {
            top: first,
            bottom,
            left: 0,
            right: cols,
            rows: 1,
        },
        RedrawEvent::Line {
            row: bottom - 1,
            col_start: 0,
            cells: fit(
                vec![LineCell::new(' ').with_attr(0).repeated(cols)],
                cols,
            ),
        },
        RedrawEvent::Line {
            row: bottom - 1,
            col_start: 0,
            cells: fit(wide_line(&text, HL_COMMENT), cols),
        },
        RedrawEvent::CursorShape(match tick % 3 {
            0 => CursorShape::Block,
            1 => CursorShape::Vertical { percentage: 25 },
            _ => CursorShape::Horizontal { percentage: 20 },
        }),
        RedrawEvent::CursorGoto {
            row: bottom - 1,
            col: text.chars().count().min(cols - 1),
        },
        RedrawEvent::Flush,
    ]
}

/// Feed the welcome screen, then a scroll step every `interval`, calling
/// `wake` after each batch.
pub async fn run_script<W>(queue: Arc<EventQueue>, rows: usize, cols: usize, interval: Duration, wake: W)
where
    W: Fn() + Send + 'static,
{
    queue.extend(welcome_screen(rows, cols));
    wake();

    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;
    let mut tick = 0u64;
    loop {
        ticker.tick().await;
        tick += 1;
        queue.extend(scroll_step(rows, cols, tick));
        wake();
    }
}
