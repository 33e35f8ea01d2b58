//! Error types for font loading.

use thiserror::Error;

/// Errors raised while loading or switching fonts.
#[derive(Error, Debug)]
pub enum FontError {
    /// No installed face matches the requested family
    #[error("font '{0}' not found")]
    NotFound(String),

    /// The file exists but is not a usable TTF/OTF/TTC
    #[error("invalid font data in '{0}'")]
    InvalidData(String),

    /// Reading a font file from disk failed
    #[error("failed to read font file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Neither the requested font nor any monospace system font could be loaded
    #[error("no usable default monospace font found")]
    NoDefaultFont,

    /// A size or DPI value that cannot produce a glyph
    #[error("invalid font size {size_pt}pt at {dpi} dpi")]
    InvalidSize { size_pt: f32, dpi: f32 },
}
