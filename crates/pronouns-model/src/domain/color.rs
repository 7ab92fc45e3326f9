use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// 24-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value; the top byte is ignored.
    pub const fn from_u32(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }

    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Lowercase six-digit hex without the leading `#`.
    pub fn hex(self) -> String {
        format!("{:06x}", self.to_u32())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

/// Fixed 16-entry palette understood by every host generation.
///
/// Each entry carries its canonical lowercase name, its single-character
/// legacy code and its RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    /// Palette in legacy code order (`0`..`f`).
    pub const ALL: [NamedColor; 16] = [
        Self::Black,
        Self::DarkBlue,
        Self::DarkGreen,
        Self::DarkAqua,
        Self::DarkRed,
        Self::DarkPurple,
        Self::Gold,
        Self::Gray,
        Self::DarkGray,
        Self::Blue,
        Self::Green,
        Self::Aqua,
        Self::Red,
        Self::LightPurple,
        Self::Yellow,
        Self::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::DarkBlue => "dark_blue",
            Self::DarkGreen => "dark_green",
            Self::DarkAqua => "dark_aqua",
            Self::DarkRed => "dark_red",
            Self::DarkPurple => "dark_purple",
            Self::Gold => "gold",
            Self::Gray => "gray",
            Self::DarkGray => "dark_gray",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Aqua => "aqua",
            Self::Red => "red",
            Self::LightPurple => "light_purple",
            Self::Yellow => "yellow",
            Self::White => "white",
        }
    }

    /// Single-character legacy formatting code (`§<code>`).
    pub fn code(self) -> char {
        match self {
            Self::Black => '0',
            Self::DarkBlue => '1',
            Self::DarkGreen => '2',
            Self::DarkAqua => '3',
            Self::DarkRed => '4',
            Self::DarkPurple => '5',
            Self::Gold => '6',
            Self::Gray => '7',
            Self::DarkGray => '8',
            Self::Blue => '9',
            Self::Green => 'a',
            Self::Aqua => 'b',
            Self::Red => 'c',
            Self::LightPurple => 'd',
            Self::Yellow => 'e',
            Self::White => 'f',
        }
    }

    pub fn rgb(self) -> Rgb {
        let v = match self {
            Self::Black => 0x000000,
            Self::DarkBlue => 0x0000aa,
            Self::DarkGreen => 0x00aa00,
            Self::DarkAqua => 0x00aaaa,
            Self::DarkRed => 0xaa0000,
            Self::DarkPurple => 0xaa00aa,
            Self::Gold => 0xffaa00,
            Self::Gray => 0xaaaaaa,
            Self::DarkGray => 0x555555,
            Self::Blue => 0x5555ff,
            Self::Green => 0x55ff55,
            Self::Aqua => 0x55ffff,
            Self::Red => 0xff5555,
            Self::LightPurple => 0xff55ff,
            Self::Yellow => 0xffff55,
            Self::White => 0xffffff,
        };
        Rgb::from_u32(v)
    }

    /// Case-insensitive lookup by palette name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Lookup by legacy code character (`0`-`9`, `a`-`f`, either case).
    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedColor {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ModelError::UnknownColor(s.to_string()))
    }
}

/// A color as the user wrote it: a palette name or a hex literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorToken {
    Named(NamedColor),
    Rgb(Rgb),
}

impl ColorToken {
    pub fn rgb(self) -> Rgb {
        match self {
            ColorToken::Named(c) => c.rgb(),
            ColorToken::Rgb(c) => c,
        }
    }
}

impl From<NamedColor> for ColorToken {
    fn from(c: NamedColor) -> Self {
        ColorToken::Named(c)
    }
}

impl From<Rgb> for ColorToken {
    fn from(c: Rgb) -> Self {
        ColorToken::Rgb(c)
    }
}

/// Renders the token the way it is persisted: lowercase name or `#rrggbb`.
impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorToken::Named(c) => fmt::Display::fmt(c, f),
            ColorToken::Rgb(c) => fmt::Display::fmt(c, f),
        }
    }
}
