//! Visual attributes an element state can carry, and the style they resolve to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Linear RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 128.0 / 255.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Colour from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Packed `0xRRGGBB` value (channels clamped and rounded).
    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

/// Error returned when a colour string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised colour `{0}` (expected #rrggbb or a basic colour name)")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            "red" => return Ok(Self::RED),
            "green" => return Ok(Self::GREEN),
            _ => {}
        }
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);
        if digits.len() != 6 {
            return Err(ParseColorError(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_hex)
            .map_err(|_| ParseColorError(s.to_string()))
    }
}

/// One recognised visual attribute. The UI collaborator decides how each is
/// drawn; the state machine only stores and applies them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualAttribute {
    /// Depth offset from the parent block.
    Offset(f32),
    BackgroundColor(Color),
    BackgroundOpacity(f32),
    FontColor(Color),
}

/// Resolved look of an element after its state attributes were applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub offset: f32,
    pub background_color: Color,
    pub background_opacity: f32,
    pub font_color: Color,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            offset: 0.0,
            background_color: Color::BLACK,
            background_opacity: 0.5,
            font_color: Color::WHITE,
        }
    }
}

impl ElementStyle {
    /// Apply attributes in order; later entries win.
    pub fn apply(&mut self, attributes: &[VisualAttribute]) {
        for attribute in attributes {
            match *attribute {
                VisualAttribute::Offset(v) => self.offset = v,
                VisualAttribute::BackgroundColor(c) => self.background_color = c,
                VisualAttribute::BackgroundOpacity(v) => self.background_opacity = v,
                VisualAttribute::FontColor(c) => self.font_color = c,
            }
        }
    }
}
