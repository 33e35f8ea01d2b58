//! Loading faces from the system font database or from disk.

use std::path::Path;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};

use super::fallbacks::DEFAULT_MONOSPACE_FAMILIES;
use super::types::FontData;
use crate::error::FontError;

/// Whether a configured font string names a file rather than a family.
pub(super) fn looks_like_path(family_or_path: &str) -> bool {
    let lower = family_or_path.to_ascii_lowercase();
    family_or_path.contains('/')
        || family_or_path.contains('\\')
        || lower.ends_with(".ttf")
        || lower.ends_with(".otf")
        || lower.ends_with(".ttc")
}

/// Load a font file from disk.
pub(super) fn load_font_from_path(path: &Path) -> Result<FontData, FontError> {
    let display = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| FontError::Io {
        path: display.clone(),
        source,
    })?;
    FontData::new(bytes, display.clone()).ok_or(FontError::InvalidData(display))
}

/// Load the regular face of `family` from the database.
pub(super) fn load_font_from_db(db: &Database, family: &str) -> Option<FontData> {
    load_font_from_db_with_style(db, family, Weight::NORMAL, Style::Normal)
}

/// Load a face of `family` with the given weight and style.
///
/// `fontdb` returns the closest match, so a bold or italic query against a
/// family without that variant would hand back the regular face. Those
/// near-misses are rejected so callers can fall back to synthetic styling.
pub(super) fn load_font_from_db_with_style(
    db: &Database,
    family: &str,
    weight: Weight,
    style: Style,
) -> Option<FontData> {
    let families = [Family::Name(family)];
    let query = Query {
        families: &families,
        weight,
        stretch: Stretch::Normal,
        style,
    };
    let id = db.query(&query)?;
    let face = db.face(id)?;

    let wants_bold = weight.0 >= Weight::SEMIBOLD.0;
    let is_bold = face.weight.0 >= Weight::SEMIBOLD.0;
    let wants_slanted = style != Style::Normal;
    let is_slanted = face.style != Style::Normal;
    if wants_bold != is_bold || wants_slanted != is_slanted {
        return None;
    }

    db.with_face_data(id, |data, index| {
        FontData::new_with_index(data.to_vec(), index as usize, family)
    })
    .flatten()
}

/// Find any usable regular monospace face.
pub(super) fn load_default_monospace(db: &Database) -> Option<FontData> {
    for family in DEFAULT_MONOSPACE_FAMILIES {
        if let Some(font) = load_font_from_db(db, family) {
            log::info!("Using default monospace font: {}", family);
            return Some(font);
        }
    }

    let face = db
        .faces()
        .find(|face| face.monospaced && face.style == Style::Normal)?;
    let name = face
        .families
        .first()
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| face.post_script_name.clone());
    log::info!("Using first monospace system font: {}", name);
    db.with_face_data(face.id, |data, index| {
        FontData::new_with_index(data.to_vec(), index as usize, name.clone())
    })
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_path() {
        assert!(looks_like_path("/usr/share/fonts/Foo.ttf"));
        assert!(looks_like_path("C:\\Fonts\\foo.otf"));
        assert!(looks_like_path("Foo.TTC"));
        assert!(!looks_like_path("JetBrains Mono"));
        assert!(!looks_like_path("monospace"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_font_from_path(Path::new("/nonexistent/neogrid/font.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }
}
