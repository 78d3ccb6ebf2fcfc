//! Display colors for classes, underlays and map layers.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::classify::BinError;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 0xff, g: 0xff, b: 0xff };
    pub const BLACK: Rgb = Rgb { r: 0x00, g: 0x00, b: 0x00 };
    pub const GRAY: Rgb = Rgb { r: 0x80, g: 0x80, b: 0x80 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Parse `#rrggbb`, `#rgb`, or one of the handful of CSS names the
    /// built-in map palettes use.
    pub fn parse(text: &str) -> Result<Self, BinError> {
        let text = text.trim();
        if let Some(named) = named_color(text) { return Ok(named) }

        let invalid = || BinError::InvalidColor(text.to_string());
        let hex = text.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) { return Err(invalid()) }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// True for pure white; white markers get a black outline so they stay
    /// visible on a light background.
    #[inline]
    pub fn is_white(&self) -> bool { *self == Self::WHITE }
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b))
    }
}

impl FromStr for Rgb {
    type Err = BinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl TryFrom<String> for Rgb {
    type Error = BinError;

    fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self { color.to_string() }
}

fn named_color(name: &str) -> Option<Rgb> {
    match name.to_ascii_lowercase().as_str() {
        "white" => Some(Rgb::WHITE),
        "black" => Some(Rgb::BLACK),
        "gray" | "grey" => Some(Rgb::GRAY),
        "pink" => Some(Rgb::new(0xff, 0xc0, 0xcb)),
        "lightgreen" => Some(Rgb::new(0x90, 0xee, 0x90)),
        "mediumseagreen" => Some(Rgb::new(0x3c, 0xb3, 0x71)),
        "darkgreen" => Some(Rgb::new(0x00, 0x64, 0x00)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_hex() {
        let color = Rgb::parse("#7f2704").unwrap();
        assert_eq!(color, Rgb::new(0x7f, 0x27, 0x04));
        assert_eq!(color.to_string(), "#7f2704");
    }

    #[test]
    fn formatting_lowercases_input() {
        assert_eq!(Rgb::parse("#47CEF5").unwrap().to_string(), "#47cef5");
    }

    #[test]
    fn display_honours_width() {
        assert_eq!(format!("{:<9}|", Rgb::WHITE), "#ffffff  |");
        assert_eq!(format!("{:>8}", Rgb::BLACK), " #000000");
    }

    #[test]
    fn expands_short_hex() {
        assert_eq!(Rgb::parse("#fff").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn accepts_palette_names() {
        assert_eq!(Rgb::parse("white").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::parse("darkgreen").unwrap().to_string(), "#006400");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Rgb::parse("7f2704").is_err());
        assert!(Rgb::parse("#7f27").is_err());
        assert!(Rgb::parse("#zzzzzz").is_err());
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb::new(8, 81, 156)).unwrap();
        assert_eq!(json, "\"#08519c\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(8, 81, 156));
    }
}
