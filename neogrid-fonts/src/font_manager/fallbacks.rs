//! Font family lists used when the primary face is missing a glyph or missing
//! altogether.

/// Fallback font families in priority order.
///
/// Searched in order when the primary face has no glyph for a codepoint:
/// monospace faces first, then CJK, then symbol faces, then broad coverage.
pub const FALLBACK_FAMILIES: &[&str] = &[
    // Standard monospace fonts
    "JetBrains Mono",
    "Fira Code",
    "DejaVu Sans Mono",
    "Menlo",
    "Consolas",
    // CJK fonts
    "Noto Sans Mono CJK JP",
    "Noto Sans CJK JP",
    "Noto Sans CJK SC",
    "Microsoft YaHei",
    "MS Gothic",
    // Symbol fonts
    "Symbols Nerd Font",
    "Apple Symbols",
    "Segoe UI Symbol",
    "Noto Sans Symbols",
    "Noto Sans Symbols 2",
    "DejaVu Sans",
    "Symbola",
    // General fallbacks
    "Arial Unicode MS",
    "Liberation Sans",
];

/// Families tried, in order, when the configured font cannot be used at
/// startup (or when the configured family is the generic `monospace`).
pub const DEFAULT_MONOSPACE_FAMILIES: &[&str] = &[
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "Ubuntu Mono",
    "Menlo",
    "SF Mono",
    "Consolas",
    "Cascadia Mono",
    "Courier New",
];
