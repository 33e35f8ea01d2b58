//! Font management with a fallback chain for Unicode coverage.
//!
//! Supports a primary face with bold/italic/bold-italic variants (looked up in
//! the same family) and a list of system fallback faces searched in order when
//! the styled face has no glyph.

mod fallbacks;
mod loader;
mod types;

use std::path::Path;

use fontdb::{Database, Style, Weight};
use swash::FontRef;

use crate::error::FontError;

pub use fallbacks::{DEFAULT_MONOSPACE_FAMILIES, FALLBACK_FAMILIES};
pub use types::FontData;

/// Font index of the regular face.
pub const PRIMARY_INDEX: usize = 0;
const BOLD_INDEX: usize = 1;
const ITALIC_INDEX: usize = 2;
const BOLD_ITALIC_INDEX: usize = 3;
const FALLBACK_START_INDEX: usize = 4;

/// Manages the primary face, its styled variants and the fallback chain.
///
/// Font indices are assigned as follows:
/// - 0: Primary/regular font
/// - 1: Bold font (if available)
/// - 2: Italic font (if available)
/// - 3: Bold-italic font (if available)
/// - 4..: Fallback fonts
pub struct FontManager {
    primary: FontData,
    bold: Option<FontData>,
    italic: Option<FontData>,
    bold_italic: Option<FontData>,
    fallbacks: Vec<FontData>,
}

impl std::fmt::Debug for FontManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontManager")
            .field("primary", &self.primary.name)
            .field("font_count", &self.font_count())
            .finish()
    }
}

impl FontManager {
    /// Load `family_or_path` for startup use.
    ///
    /// A missing family falls back to the first available monospace system
    /// font with a warning; only a system without any usable monospace face
    /// is an error.
    pub fn new(family_or_path: &str) -> Result<Self, FontError> {
        Self::build(family_or_path, false)
    }

    /// Load exactly `family_or_path`, failing if it cannot be found.
    ///
    /// Used for user-requested font changes, where silently substituting a
    /// different family would be surprising.
    pub fn load_exact(family_or_path: &str) -> Result<Self, FontError> {
        Self::build(family_or_path, true)
    }

    fn build(family_or_path: &str, strict: bool) -> Result<Self, FontError> {
        let mut font_db = Database::new();
        font_db.load_system_fonts();
        log::info!("Loaded {} system fonts", font_db.len());

        let is_path = loader::looks_like_path(family_or_path);
        let primary = Self::load_primary_font(&font_db, family_or_path, is_path, strict)?;
        log::info!("Primary font: {}", primary.name);

        let (bold, italic, bold_italic) = if is_path {
            (None, None, None)
        } else {
            let family = primary.name.clone();
            (
                Self::load_styled_font(&font_db, &family, "bold", Weight::BOLD, Style::Normal),
                Self::load_styled_font(&font_db, &family, "italic", Weight::NORMAL, Style::Italic),
                Self::load_styled_font(
                    &font_db,
                    &family,
                    "bold italic",
                    Weight::BOLD,
                    Style::Italic,
                ),
            )
        };

        let fallbacks = Self::build_fallback_chain(&font_db, &primary.name);
        log::info!("Loaded {} fallback fonts", fallbacks.len());

        Ok(FontManager {
            primary,
            bold,
            italic,
            bold_italic,
            fallbacks,
        })
    }

    fn load_primary_font(
        font_db: &Database,
        family_or_path: &str,
        is_path: bool,
        strict: bool,
    ) -> Result<FontData, FontError> {
        let requested = if is_path {
            log::info!("Attempting to load font file: {}", family_or_path);
            loader::load_font_from_path(Path::new(family_or_path))
        } else if family_or_path.eq_ignore_ascii_case("monospace") {
            return loader::load_default_monospace(font_db).ok_or(FontError::NoDefaultFont);
        } else {
            log::info!("Attempting to load primary font: {}", family_or_path);
            loader::load_font_from_db(font_db, family_or_path)
                .ok_or_else(|| FontError::NotFound(family_or_path.to_string()))
        };

        match requested {
            Ok(font) => Ok(font),
            Err(e) if strict => Err(e),
            Err(e) => {
                log::warn!("{}, falling back to default monospace font", e);
                loader::load_default_monospace(font_db).ok_or(FontError::NoDefaultFont)
            }
        }
    }

    fn load_styled_font(
        font_db: &Database,
        family: &str,
        style_name: &str,
        weight: Weight,
        style: Style,
    ) -> Option<FontData> {
        let font = loader::load_font_from_db_with_style(font_db, family, weight, style);
        if font.is_some() {
            log::debug!("Loaded {} variant of {}", style_name, family);
        } else {
            log::debug!("No {} variant of {}, will synthesize", style_name, family);
        }
        font
    }

    fn build_fallback_chain(font_db: &Database, primary_name: &str) -> Vec<FontData> {
        FALLBACK_FAMILIES
            .iter()
            .filter(|family| !family.eq_ignore_ascii_case(primary_name))
            .filter_map(|family| {
                let font = loader::load_font_from_db(font_db, family)?;
                log::debug!("Added fallback font: {}", family);
                Some(font)
            })
            .collect()
    }

    fn styled_index(&self, bold: bool, italic: bool) -> usize {
        match (bold, italic) {
            (true, true) if self.bold_italic.is_some() => BOLD_ITALIC_INDEX,
            (true, _) if self.bold.is_some() => BOLD_INDEX,
            (_, true) if self.italic.is_some() => ITALIC_INDEX,
            _ => PRIMARY_INDEX,
        }
    }

    /// Find a glyph for a character across the fallback chain.
    ///
    /// Returns `(font_index, glyph_id)`, or `None` when no loaded face maps
    /// the character.
    pub fn find_glyph(&self, character: char, bold: bool, italic: bool) -> Option<(usize, u16)> {
        let styled_idx = self.styled_index(bold, italic);
        let mut candidates = vec![styled_idx];
        if styled_idx != PRIMARY_INDEX {
            candidates.push(PRIMARY_INDEX);
        }
        candidates.extend(FALLBACK_START_INDEX..FALLBACK_START_INDEX + self.fallbacks.len());

        for font_idx in candidates {
            let Some(font) = self.get_font(font_idx) else {
                continue;
            };
            let glyph_id = font.charmap().map(character);
            if glyph_id != 0 {
                if font_idx >= FALLBACK_START_INDEX {
                    log::debug!(
                        "Character '{}' (U+{:04X}) found in fallback font index {}",
                        character,
                        character as u32,
                        font_idx
                    );
                }
                return Some((font_idx, glyph_id));
            }
        }

        log::debug!(
            "Character '{}' (U+{:04X}) not found in any font ({} total fonts)",
            character,
            character as u32,
            self.font_count()
        );
        None
    }

    /// Whether `font_index` is a real bold face (as opposed to one that needs
    /// synthetic emboldening).
    pub fn is_bold_face(&self, font_index: usize) -> bool {
        matches!(font_index, BOLD_INDEX | BOLD_ITALIC_INDEX)
    }

    /// Get font reference by index.
    pub fn get_font(&self, font_index: usize) -> Option<FontRef<'static>> {
        match font_index {
            PRIMARY_INDEX => Some(self.primary.font_ref),
            BOLD_INDEX => self.bold.as_ref().map(|f| f.font_ref),
            ITALIC_INDEX => self.italic.as_ref().map(|f| f.font_ref),
            BOLD_ITALIC_INDEX => self.bold_italic.as_ref().map(|f| f.font_ref),
            idx => self
                .fallbacks
                .get(idx - FALLBACK_START_INDEX)
                .map(|f| f.font_ref),
        }
    }

    /// The primary (regular) face; cell metrics derive from it.
    pub fn primary_font(&self) -> FontRef<'static> {
        self.primary.font_ref
    }

    /// Family name (or path) of the primary face.
    pub fn primary_name(&self) -> &str {
        &self.primary.name
    }

    /// Number of loaded faces (primary + styled + fallbacks).
    pub fn font_count(&self) -> usize {
        1 + self.bold.is_some() as usize
            + self.italic.is_some() as usize
            + self.bold_italic.is_some() as usize
            + self.fallbacks.len()
    }
}
