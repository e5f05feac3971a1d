use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color representation with f32 components in [0.0, 1.0] range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new RGBA color.
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 1.0).
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from 8-bit channels and a 0..1 alpha.
    pub fn from_rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Parse any color string accepted in project files: hex
    /// (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb(...)`, `rgba(...)`,
    /// and a few keywords.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let s = input.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "transparent" => return Ok(Color::TRANSPARENT),
            "white" => return Ok(Color::WHITE),
            "black" => return Ok(Color::BLACK),
            _ => {}
        }
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            let args = args
                .strip_suffix(')')
                .ok_or_else(|| ColorError::InvalidFunction(s.to_string()))?;
            return Self::from_rgb_args(args, s);
        }
        Self::from_hex(s)
    }

    fn from_rgb_args(args: &str, original: &str) -> Result<Self, ColorError> {
        let parts: Vec<&str> = args
            .split(|c| c == ',' || c == '/' || c == ' ')
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(ColorError::InvalidFunction(original.to_string()));
        }
        let channel = |p: &str| -> Result<u8, ColorError> {
            let v = if let Some(pct) = p.strip_suffix('%') {
                pct.parse::<f32>().map(|v| v * 2.55)
            } else {
                p.parse::<f32>()
            }
            .map_err(|_| ColorError::InvalidFunction(original.to_string()))?;
            Ok(v.round().clamp(0.0, 255.0) as u8)
        };
        let r = channel(parts[0])?;
        let g = channel(parts[1])?;
        let b = channel(parts[2])?;
        let a = match parts.get(3) {
            Some(p) => {
                if let Some(pct) = p.strip_suffix('%') {
                    pct.parse::<f32>().map(|v| v / 100.0)
                } else {
                    p.parse::<f32>()
                }
                .map_err(|_| ColorError::InvalidFunction(original.to_string()))?
            }
            None => 1.0,
        };
        Ok(Self::from_rgb8(r, g, b, a))
    }

    /// Create a color from a hex string (e.g., "#F00", "#FF0000" or "#FF0000FF").
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(ColorError::InvalidHex);
        }
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorError::InvalidHex);
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| ColorError::InvalidHex)
        };
        match hex.len() {
            3 => Ok(Self::from_rgb8(nibble(0)?, nibble(1)?, nibble(2)?, 1.0)),
            4 => Ok(Self::from_rgb8(
                nibble(0)?,
                nibble(1)?,
                nibble(2)?,
                nibble(3)? as f32 / 255.0,
            )),
            6 => Ok(Self::from_rgb8(pair(0)?, pair(2)?, pair(4)?, 1.0)),
            8 => Ok(Self::from_rgb8(
                pair(0)?,
                pair(2)?,
                pair(4)?,
                pair(6)? as f32 / 255.0,
            )),
            _ => Err(ColorError::InvalidHex),
        }
    }

    /// Convert to RGBA u8 tuple.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.a * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }

    /// Same color with alpha multiplied by `factor`.
    pub fn scale_alpha(&self, factor: f32) -> Color {
        Color {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..*self
        }
    }

    /// Linearly interpolate between two colors.
    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// CSS `rgba()` notation, used in effect descriptions.
    pub fn to_css(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        let a = (self.a * 1000.0).round() / 1000.0;
        format!("rgba({}, {}, {}, {})", r, g, b, a)
    }

    // --- Named constants ---

    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const RED: Color = Color {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const GREEN: Color = Color {
        r: 0.0,
        g: 1.0,
        b: 0.0,
        a: 1.0,
    };
    pub const BLUE: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 1.0,
        a: 1.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }
}

impl std::str::FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color string")]
    InvalidHex,
    #[error("invalid color function: {0}")]
    InvalidFunction(String),
}
