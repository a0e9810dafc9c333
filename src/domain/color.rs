//! Deterministic colors derived from tier names and item labels.
//!
//! Every color is a pure function of its input string, so the same label
//! always renders with the same accent regardless of where it sits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hue offset applied to item labels so items and tiers sharing a label
/// still look distinct.
pub const ITEM_HUE_OFFSET: u32 = 120;

/// A color in HSL space, rendered as a CSS `hsl()` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue: hue % 360,
            saturation,
            lightness,
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({} {}% {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Two-stop diagonal gradient used as a tier background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gradient {
    pub from: Hsl,
    pub to: Hsl,
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "linear-gradient(135deg, {}, {})", self.from, self.to)
    }
}

/// Polynomial rolling hash (multiplier 31) over UTF-16 code units.
///
/// Arithmetic wraps in the signed 32-bit range and the absolute value of
/// the final state is returned, so `i32::MIN` maps to `2^31`.
pub fn hash_string(text: &str) -> u32 {
    let hash = text
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs()
}

/// Hue in degrees for `text`, shifted by `offset`
pub fn color_for(text: &str, offset: u32) -> u16 {
    ((u64::from(hash_string(text)) + u64::from(offset)) % 360) as u16
}

/// Accent color for a tier name
pub fn accent_color(text: &str) -> Hsl {
    Hsl::new(color_for(text, 0), 80, 45)
}

/// Accent color for an item label
pub fn item_accent_color(text: &str) -> Hsl {
    Hsl::new(color_for(text, ITEM_HUE_OFFSET), 80, 45)
}

/// Soft background gradient for a tier name
pub fn background_gradient(text: &str) -> Gradient {
    let hue = color_for(text, 0);
    Gradient {
        from: Hsl::new(hue, 85, 90),
        to: Hsl::new((hue + 18) % 360, 90, 94),
    }
}
