use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{GifsciiError, GifsciiResult};

/// Largest possible [`distance`] between two colors: `sqrt(3 * 255^2)`.
pub const MAX_DISTANCE: f64 = 441.672_955_930_063_7;

/// Opaque RGB triplet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Black (`#000000`).
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White (`#ffffff`).
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Build a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance to `other` in RGB space.
    pub fn distance(self, other: Self) -> f64 {
        distance(self, other)
    }

    /// Lowercase `#rrggbb` text.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = GifsciiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

/// Parse 3- or 6-digit hex color text, with or without a leading `#`.
///
/// The 3-digit form duplicates each nibble (`#abc` == `#aabbcc`).
pub fn parse_color(text: &str) -> GifsciiResult<Color> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(GifsciiError::invalid_color(format!(
            "\"{text}\" contains non-hex characters"
        )));
    }

    fn nibble(b: u8) -> u8 {
        match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            _ => b - b'A' + 10,
        }
    }

    let bytes = digits.as_bytes();
    match bytes.len() {
        3 => {
            let [r, g, b] = [bytes[0], bytes[1], bytes[2]].map(|c| nibble(c) * 17);
            Ok(Color::rgb(r, g, b))
        }
        6 => {
            let byte = |i: usize| (nibble(bytes[i]) << 4) | nibble(bytes[i + 1]);
            Ok(Color::rgb(byte(0), byte(2), byte(4)))
        }
        n => Err(GifsciiError::invalid_color(format!(
            "\"{text}\" has {n} hex digits, expected 3 or 6"
        ))),
    }
}

/// Euclidean distance between two colors, in `[0, MAX_DISTANCE]`.
pub fn distance(a: Color, b: Color) -> f64 {
    let dr = f64::from(a.r) - f64::from(b.r);
    let dg = f64::from(a.g) - f64::from(b.g);
    let db = f64::from(a.b) - f64::from(b.b);
    (dr * dr + dg * dg + db * db).sqrt()
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_color(&s).map_err(serde::de::Error::custom),
            Repr::Arr([r, g, b]) => Ok(Color::rgb(r, g, b)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/rgb.rs"]
mod tests;
