//! 24-bit color type and conversion helpers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A 24-bit RGB color as sent by the editor (`0xRRGGBB`).
///
/// Serialized in config files as a `"#rrggbb"` string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const WHITE: Rgb = Rgb(0xFFFFFF);

    /// Build from individual channels.
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Rgb(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Split into `[r, g, b]` bytes. Bits above 24 are ignored.
    pub const fn to_u8(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        ]
    }

    /// Normalized `[r, g, b, a]` with the given alpha.
    #[inline]
    pub fn to_f32_a(self, alpha: f32) -> [f32; 4] {
        color_u8_to_f32_a(self.to_u8(), alpha)
    }

    /// Parse `"#rrggbb"` or `"rrggbb"`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Rgb)
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb(#{:06x})", self.0 & 0xFF_FFFF)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0xFF_FFFF)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::parse_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}', expected #rrggbb")))
    }
}

// ============================================================================
// Color Conversion Helpers
// ============================================================================

/// Convert a `[u8; 3]` RGB color to `[f32; 3]` normalized to 0.0..1.0.
#[inline]
pub fn color_u8_to_f32(rgb: [u8; 3]) -> [f32; 3] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}

/// Convert a `[u8; 3]` RGB color to `[f32; 4]` normalized to 0.0..1.0 with
/// the given alpha value appended.
#[inline]
pub fn color_u8_to_f32_a(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    let [r, g, b] = color_u8_to_f32(rgb);
    [r, g, b, alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_round_trip() {
        let c = Rgb::from_channels(0x12, 0x34, 0x56);
        assert_eq!(c, Rgb(0x123456));
        assert_eq!(c.to_u8(), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse_hex("#ff0000"), Some(Rgb(0xFF0000)));
        assert_eq!(Rgb::parse_hex("00ff00"), Some(Rgb(0x00FF00)));
        assert_eq!(Rgb::parse_hex("#fff"), None);
        assert_eq!(Rgb::parse_hex("zzzzzz"), None);
    }

    #[test]
    fn test_to_f32_a() {
        let c = Rgb::WHITE.to_f32_a(0.5);
        assert_eq!(c, [1.0, 1.0, 1.0, 0.5]);
        assert_eq!(Rgb::BLACK.to_f32_a(1.0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_display_masks_high_bits() {
        assert_eq!(Rgb(0x01FF_FFFF).to_string(), "#ffffff");
    }
}
