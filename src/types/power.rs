//! Power state and power-on mode for light control.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Power state for a light, sent on the wire as `"on"` / `"off"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn is_on(self) -> bool {
        matches!(self, PowerState::On)
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { PowerState::On } else { PowerState::Off }
    }
}

/// Mode a light switches into when powered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(try_from = "u8", into = "u8")]
pub enum PowerModeHint {
    Normal = 0,
    Temperature = 1,
    Rgb = 2,
    Hsv = 3,
    ColorFlow = 4,
    NightLight = 5,
}

impl PowerModeHint {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl From<PowerModeHint> for u8 {
    fn from(mode: PowerModeHint) -> Self {
        mode.value()
    }
}

impl TryFrom<u8> for PowerModeHint {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        use strum::IntoEnumIterator;

        PowerModeHint::iter()
            .find(|mode| mode.value() == value)
            .ok_or_else(|| format!("unknown power mode {value}"))
    }
}
