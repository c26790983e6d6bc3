//! RGB color representation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An RGB color with red, green, and blue components (0-255 each).
///
/// Devices take colors packed into a single integer, `0xRRGGBB`.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
}

impl Color {
    pub(crate) const MAX_PACKED: u32 = 0xFF_FF_FF;

    /// Create a color with the given RGB values.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a color from wide channel values.
    ///
    /// Returns `None` if any channel exceeds 255.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_rs::Color;
    ///
    /// assert!(Color::create(255, 0, 128).is_some());
    /// assert!(Color::create(256, 0, 0).is_none());
    /// ```
    pub fn create(red: u32, green: u32, blue: u32) -> Option<Self> {
        Some(Self::rgb(
            u8::try_from(red).ok()?,
            u8::try_from(green).ok()?,
            u8::try_from(blue).ok()?,
        ))
    }

    /// Unpack a `0xRRGGBB` integer. Returns `None` above `0xFFFFFF`.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_rs::Color;
    ///
    /// let color = Color::from_packed(0xFF8000).unwrap();
    /// assert_eq!((color.red(), color.green(), color.blue()), (255, 128, 0));
    /// assert_eq!(color.packed(), 0xFF8000);
    /// assert!(Color::from_packed(0x1000000).is_none());
    /// ```
    pub fn from_packed(value: u32) -> Option<Self> {
        if value > Self::MAX_PACKED {
            return None;
        }
        let [_, red, green, blue] = value.to_be_bytes();
        Some(Self::rgb(red, green, blue))
    }

    /// The color packed as `0xRRGGBB`.
    pub fn packed(&self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse from comma-separated string (e.g., "255,128,0").
    fn from_str(s: &str) -> Result<Self, String> {
        let parts = s
            .split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| e.to_string())?;
        match parts.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            _ => Err("Expected format: r,g,b".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Color::from_str("255, 0,10").unwrap(), Color::rgb(255, 0, 10));
        assert!(Color::from_str("255,0").is_err());
        assert!(Color::from_str("300,0,0").is_err());
    }

    #[test]
    fn test_packed_channels() {
        assert_eq!(Color::rgb(0, 0, 255).packed(), 255);
        assert_eq!(Color::rgb(0, 1, 0).packed(), 256);
        assert_eq!(Color::rgb(255, 255, 255).packed(), 16_777_215);
    }
}
