//! Default values for configuration fields.

use crate::color::Rgb;

pub fn font_family() -> String {
    "monospace".to_string()
}

pub fn font_size() -> f32 {
    12.0
}

pub fn box_drawing() -> bool {
    true // Procedural box/block glyphs keep line art seamless regardless of font coverage
}

pub fn default_foreground() -> Rgb {
    Rgb::WHITE
}

pub fn default_background() -> Rgb {
    Rgb::BLACK
}

pub fn default_special() -> Rgb {
    Rgb(0xFF0000)
}

pub fn initial_rows() -> usize {
    24
}

pub fn initial_cols() -> usize {
    80
}

pub fn atlas_width() -> u32 {
    1024
}

pub fn atlas_initial_height() -> u32 {
    256
}

pub fn atlas_max_height() -> u32 {
    4096
}

pub fn window_title() -> String {
    "neogrid".to_string()
}
