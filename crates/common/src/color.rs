//! Validated RGB color values.
//!
//! Every color that reaches a fill or outline is parsed from a
//! 6-hex-digit string up front, so serializers can embed `#rrggbb`
//! references without re-validating.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::QrForgeError;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string. The leading `#` is optional; anything
    /// other than exactly six hex digits is rejected.
    pub fn parse(s: &str) -> Result<Self, QrForgeError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(QrForgeError::validation(format!(
                "invalid color '{s}': expected 6 hex digits"
            )));
        }
        let r = u8::from_str_radix(&hex[0..2], 16).expect("validated hex");
        let g = u8::from_str_radix(&hex[2..4], 16).expect("validated hex");
        let b = u8::from_str_radix(&hex[4..6], 16).expect("validated hex");
        Ok(Self { r, g, b })
    }

    /// Canonical `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Components as `[0.0, 1.0]` floats (PDF/PostScript operand form).
    pub fn to_rgb_f32(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = QrForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_hash() {
        assert_eq!(Color::parse("#ff8000").unwrap(), Color::new(255, 128, 0));
        assert_eq!(Color::parse("ff8000").unwrap(), Color::new(255, 128, 0));
    }

    #[test]
    fn test_parse_rejects_short_and_junk() {
        assert!(Color::parse("#fff").is_err());
        assert!(Color::parse("#ff80zz").is_err());
        assert!(Color::parse("").is_err());
        assert!(Color::parse("#ff8000ff").is_err());
    }

    #[test]
    fn test_hex_roundtrip() {
        let color = Color::new(18, 52, 86);
        assert_eq!(color.to_hex(), "#123456");
        assert_eq!(Color::parse(&color.to_hex()).unwrap(), color);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::BLACK).unwrap();
        assert_eq!(json, "\"#000000\"");
        let parsed: Color = serde_json::from_str("\"#abcdef\"").unwrap();
        assert_eq!(parsed, Color::new(0xab, 0xcd, 0xef));
    }
}
