// NerView - core/colour.rs
//
// Deterministic entity-type colours.
//
// Colours are never stored: every render recomputes them from the type
// string, so the hash below must stay bit-for-bit stable across releases or
// old history entries will change colour. The arithmetic is the classic
// 32-bit "h * 31 + c" string hash over UTF-16 code units with two's
// complement wrap-around.

use crate::util::constants::{
    BACKGROUND_SL, BORDER_SL, BORDER_WIDTH_PX, FOREGROUND_SL, HUE_DEGREES,
};
use std::collections::HashMap;
use std::fmt;

/// A colour in hue/saturation/lightness space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsl {
    /// Degrees, 0-359.
    pub hue: u16,
    /// Percent, 0-100.
    pub saturation: u8,
    /// Percent, 0-100.
    pub lightness: u8,
}

impl Hsl {
    pub const fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Convert to 8-bit sRGB components.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let s = f32::from(self.saturation.min(100)) / 100.0;
        let l = f32::from(self.lightness.min(100)) / 100.0;
        let h = f32::from(self.hue % 360) / 60.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u8 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_byte(r), to_byte(g), to_byte(b))
    }
}

impl fmt::Display for Hsl {
    /// CSS notation, e.g. `hsl(132, 55%, 22%)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// The three swatches used to draw one entity chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColourTriple {
    pub background: Hsl,
    pub foreground: Hsl,
    pub border: Hsl,
}

impl ColourTriple {
    /// CSS `border` shorthand for the border swatch.
    pub fn border_css(&self) -> String {
        format!("{BORDER_WIDTH_PX}px solid {}", self.border)
    }
}

/// 32-bit signed string hash over UTF-16 code units.
///
/// Equivalent to `h = h * 31 + c` modulo 2^32, reinterpreted as signed.
pub fn type_hash(entity_type: &str) -> i32 {
    entity_type.encode_utf16().fold(0i32, |h, unit| {
        i32::from(unit).wrapping_add((h << 5).wrapping_sub(h))
    })
}

/// Hue in degrees for an entity type.
pub fn hue_for(entity_type: &str) -> u16 {
    // Widen before abs(): i32::MIN has no positive i32 counterpart.
    (i64::from(type_hash(entity_type)).abs() % HUE_DEGREES) as u16
}

/// Colour triple for a canonical entity type.
///
/// Pure and time-invariant: the same string yields the same colours in any
/// process.
pub fn colour_for(entity_type: &str) -> ColourTriple {
    let hue = hue_for(entity_type);
    ColourTriple {
        background: Hsl::new(hue, BACKGROUND_SL.0, BACKGROUND_SL.1),
        foreground: Hsl::new(hue, FOREGROUND_SL.0, FOREGROUND_SL.1),
        border: Hsl::new(hue, BORDER_SL.0, BORDER_SL.1),
    }
}

/// Memoising wrapper around [`colour_for`] for render loops.
#[derive(Debug, Default)]
pub struct ColourCache {
    entries: HashMap<String, ColourTriple>,
}

impl ColourCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, entity_type: &str) -> ColourTriple {
        if let Some(triple) = self.entries.get(entity_type) {
            return *triple;
        }
        let triple = colour_for(entity_type);
        self.entries.insert(entity_type.to_owned(), triple);
        triple
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
