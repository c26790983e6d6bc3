//! Color mode reported by a light.

use serde::{Deserialize, Serialize};

/// The color model a light is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ColorMode {
    Rgb = 1,
    Temperature = 2,
    Hsv = 3,
}

impl From<ColorMode> for u8 {
    fn from(mode: ColorMode) -> Self {
        mode as u8
    }
}

impl TryFrom<u8> for ColorMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            1 => Ok(ColorMode::Rgb),
            2 => Ok(ColorMode::Temperature),
            3 => Ok(ColorMode::Hsv),
            _ => Err(format!("unknown color mode {value}")),
        }
    }
}
