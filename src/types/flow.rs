//! Color flow expressions.
//!
//! A flow is a list of transitions the device plays in sequence, encoded on
//! the wire as one comma-separated string of `duration,mode,value,brightness`
//! tuples.

use serde::{Deserialize, Serialize};

use super::{Color, Kelvin};

/// What the device does once a flow has finished.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FlowAction {
    /// Return to the state before the flow started.
    #[default]
    Recover = 0,
    /// Stay at the last transition.
    Stay = 1,
    /// Turn the light off.
    TurnOff = 2,
}

impl FlowAction {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl From<FlowAction> for u8 {
    fn from(action: FlowAction) -> Self {
        action.value()
    }
}

impl TryFrom<u8> for FlowAction {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            0 => Ok(FlowAction::Recover),
            1 => Ok(FlowAction::Stay),
            2 => Ok(FlowAction::TurnOff),
            _ => Err(format!("unknown flow action {value}")),
        }
    }
}

/// Kind of a single flow transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FlowMode {
    Color = 1,
    Temperature = 2,
    Sleep = 7,
}

impl From<FlowMode> for u8 {
    fn from(mode: FlowMode) -> Self {
        mode as u8
    }
}

impl TryFrom<u8> for FlowMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            1 => Ok(FlowMode::Color),
            2 => Ok(FlowMode::Temperature),
            7 => Ok(FlowMode::Sleep),
            _ => Err(format!("unknown flow mode {value}")),
        }
    }
}

/// One step of a color flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTransition {
    /// Milliseconds, at least 50.
    pub duration: u64,
    pub mode: FlowMode,
    /// Packed RGB for [`FlowMode::Color`], Kelvin for [`FlowMode::Temperature`].
    #[serde(default)]
    pub value: u32,
    /// 1-100, or -1 to keep the current brightness.
    #[serde(default = "FlowTransition::keep_brightness")]
    pub brightness: i8,
}

impl FlowTransition {
    const MIN_DURATION_MS: u64 = 50;
    const KEEP_BRIGHTNESS: i8 = -1;

    fn keep_brightness() -> i8 {
        Self::KEEP_BRIGHTNESS
    }

    pub fn color(duration: u64, color: Color, brightness: i8) -> Self {
        FlowTransition {
            duration,
            mode: FlowMode::Color,
            value: color.packed(),
            brightness,
        }
    }

    pub fn temperature(duration: u64, kelvin: Kelvin, brightness: i8) -> Self {
        FlowTransition {
            duration,
            mode: FlowMode::Temperature,
            value: u32::from(kelvin.kelvin()),
            brightness,
        }
    }

    pub fn sleep(duration: u64) -> Self {
        FlowTransition {
            duration,
            mode: FlowMode::Sleep,
            value: 0,
            brightness: 0,
        }
    }

    /// Check ranges, returning a description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.duration < Self::MIN_DURATION_MS {
            return Err(format!(
                "flow duration {} is below {} ms",
                self.duration,
                Self::MIN_DURATION_MS
            ));
        }
        match self.mode {
            FlowMode::Sleep => return Ok(()),
            FlowMode::Color if self.value > Color::MAX_PACKED => {
                return Err(format!("flow color {:#x} out of range", self.value));
            }
            FlowMode::Temperature if Kelvin::create(self.value).is_none() => {
                return Err(format!("flow temperature {} out of range", self.value));
            }
            _ => {}
        }
        if self.brightness != Self::KEEP_BRIGHTNESS && !(1..=100).contains(&self.brightness) {
            return Err(format!("flow brightness {} out of range", self.brightness));
        }
        Ok(())
    }

    fn encode(&self) -> String {
        format!(
            "{},{},{},{}",
            self.duration,
            u8::from(self.mode),
            self.value,
            self.brightness
        )
    }
}

/// Encode transitions into the wire flow expression.
///
/// # Examples
///
/// ```
/// use yeelight_rs::{Color, FlowTransition, Kelvin, flow_expression};
///
/// let expr = flow_expression(&[
///     FlowTransition::color(1000, Color::rgb(255, 0, 0), 100),
///     FlowTransition::temperature(500, Kelvin::create(2700).unwrap(), -1),
///     FlowTransition::sleep(2000),
/// ]);
/// assert_eq!(expr, "1000,1,16711680,100,500,2,2700,-1,2000,7,0,0");
/// ```
pub fn flow_expression(transitions: &[FlowTransition]) -> String {
    transitions
        .iter()
        .map(FlowTransition::encode)
        .collect::<Vec<_>>()
        .join(",")
}
