//! CSS-style color parsing.

use std::fmt;
use std::str::FromStr;

/// A straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0.0, 1.0]`.
    pub a: f32,
}

/// Why a color string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,

    #[error("invalid hex color: {0}")]
    InvalidHex(String),

    #[error("invalid color function: {0}")]
    InvalidFunction(String),

    #[error("unknown color: {0}")]
    Unknown(String),
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as straight-alpha floats in `[0.0, 1.0]`.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a,
        ]
    }

    /// Same color with its alpha multiplied by `factor`.
    pub fn with_alpha_scaled(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Convert to an 8-bit pixel.
    pub fn to_rgba8(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, (self.a * 255.0).round() as u8])
    }

    fn parse_hex(hex: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError::InvalidHex(format!("#{hex}"));
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

        let (r, g, b, a) = match hex.len() {
            3 => (nibble(0), nibble(1), nibble(2), Ok(255)),
            4 => (nibble(0), nibble(1), nibble(2), nibble(3)),
            6 => (byte(0), byte(2), byte(4), Ok(255)),
            8 => (byte(0), byte(2), byte(4), byte(6)),
            _ => return Err(invalid()),
        };
        match (r, g, b, a) {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Self::rgba(r, g, b, a as f32 / 255.0)),
            _ => Err(invalid()),
        }
    }

    fn parse_function(name: &str, args: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError::InvalidFunction(format!("{name}({args})"));
        let parts: Vec<&str> = args
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        let channel = |s: &str| -> Option<u8> {
            let v: f32 = s.parse().ok()?;
            v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
        };
        let alpha = |s: &str| -> Option<f32> {
            let v: f32 = match s.strip_suffix('%') {
                Some(pct) => pct.parse::<f32>().ok()? / 100.0,
                None => s.parse().ok()?,
            };
            v.is_finite().then(|| v.clamp(0.0, 1.0))
        };

        match parts.as_slice() {
            [r, g, b] => Ok(Self::rgb(
                channel(r).ok_or_else(invalid)?,
                channel(g).ok_or_else(invalid)?,
                channel(b).ok_or_else(invalid)?,
            )),
            [r, g, b, a] => Ok(Self::rgba(
                channel(r).ok_or_else(invalid)?,
                channel(g).ok_or_else(invalid)?,
                channel(b).ok_or_else(invalid)?,
                alpha(a).ok_or_else(invalid)?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        let lower = s.to_ascii_lowercase();
        if let Some((name, rest)) = lower.split_once('(') {
            let name = name.trim();
            let args = rest
                .strip_suffix(')')
                .ok_or_else(|| ColorParseError::InvalidFunction(s.to_string()))?;
            return match name {
                "rgb" | "rgba" => Self::parse_function(name, args),
                _ => Err(ColorParseError::InvalidFunction(s.to_string())),
            };
        }

        match lower.as_str() {
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "transparent" => Ok(Self::TRANSPARENT),
            _ => Err(ColorParseError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}
