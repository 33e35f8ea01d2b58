//! Owned font bytes paired with a swash reference.

use std::sync::Arc;
use swash::FontRef;

/// Stores font data with lifetime management.
///
/// The `FontRef` borrows from `data`, which is kept alive by the `Arc` for as
/// long as this struct (or any clone) exists.
#[derive(Clone)]
pub struct FontData {
    /// Raw font data bytes (TTF/OTF/TTC)
    pub data: Arc<Vec<u8>>,
    /// Swash font reference for glyph operations
    pub font_ref: FontRef<'static>,
    /// Family name used for logging
    pub name: String,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("name", &self.name)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FontData {
    /// Parse font bytes using face index 0.
    pub fn new(data: Vec<u8>, name: impl Into<String>) -> Option<Self> {
        Self::new_with_index(data, 0, name)
    }

    /// Parse font bytes selecting a face inside a collection.
    pub fn new_with_index(data: Vec<u8>, face_index: usize, name: impl Into<String>) -> Option<Self> {
        let data_arc = Arc::new(data);

        // SAFETY: the bytes live in an Arc stored next to the FontRef, so the
        // reference can never outlive them.
        let font_ref = unsafe {
            let bytes = data_arc.as_slice();
            let static_bytes: &'static [u8] = std::mem::transmute(bytes);
            FontRef::from_index(static_bytes, face_index)?
        };

        Some(FontData {
            data: data_arc,
            font_ref,
            name: name.into(),
        })
    }

    /// Whether the face maps `ch` to a real glyph.
    pub fn has_glyph(&self, ch: char) -> bool {
        self.font_ref.charmap().map(ch) != 0
    }
}
