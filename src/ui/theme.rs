// NerView - ui/theme.rs
//
// Terminal colour mapping for entity swatches and fixed UI accents.
// No dependencies on app state or business logic.

use crate::core::colour::{ColourTriple, Hsl};
use crossterm::style::Color;

/// Truecolor terminal colour for an HSL swatch.
pub fn terminal_colour(hsl: Hsl) -> Color {
    let (r, g, b) = hsl.to_rgb();
    Color::Rgb { r, g, b }
}

/// (foreground, background) pair used to paint an entity token.
pub fn chip_colours(triple: &ColourTriple) -> (Color, Color) {
    (
        terminal_colour(triple.foreground),
        terminal_colour(triple.background),
    )
}

/// Section heading colour.
pub const HEADING: Color = Color::Rgb {
    r: 209,
    g: 213,
    b: 219,
}; // Gray 300

/// Secondary text (dates, ids).
pub const MUTED: Color = Color::Rgb {
    r: 107,
    g: 114,
    b: 128,
}; // Gray 500
