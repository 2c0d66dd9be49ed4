use std::{fmt, str::FromStr};

use bytemuck::{Pod, Zeroable};

pub const DEFAULT_BACKGROUND_COLOR: Color = Color::new(0, 0, 0);
pub const DEFAULT_FOREGROUND_COLOR: Color = Color::new(255, 255, 255);

/// 24-bit RGB pixel, laid out as in a binary PPM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Color, ColorParseError> {
        let s = s.strip_prefix("0x").unwrap_or(s);

        if s.len() != 6 || s.chars().any(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_owned()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&s[range], 16).map_err(|_| ColorParseError(s.to_owned()))
        };

        Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse hex color: {}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("0xAABBFF".parse::<Color>(), Ok(Color::new(0xAA, 0xBB, 0xFF)));
        assert_eq!("102030".parse::<Color>(), Ok(Color::new(0x10, 0x20, 0x30)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!("0xAABB".parse::<Color>().is_err());
        assert!("GGGGGG".parse::<Color>().is_err());
    }
}
