//! Color commands: temperature, RGB and HSV.

use serde_json::{Value, json};

use super::{Operation, transition, transition_params};
use crate::command::input::{HsvInput, RgbInput, TemperatureInput};
use crate::errors::Error;
use crate::feature::Feature;
use crate::state::DeviceState;
use crate::types::{Color, HueSaturation, Kelvin, Transition};

type Result<T> = std::result::Result<T, Error>;

/// `set_ct_abx`: `[ct, effect, duration]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureCommand {
    feature: Feature,
    kelvin: Kelvin,
    transition: Transition,
}

impl TemperatureCommand {
    pub(crate) fn new(input: &TemperatureInput) -> Result<Self> {
        let kelvin = Kelvin::create(input.ct).ok_or_else(|| {
            Error::invalid_params(input.feature, format!("temperature {} out of range", input.ct))
        })?;
        Ok(TemperatureCommand {
            feature: input.feature,
            kelvin,
            transition: transition(input.feature, input.effect, input.duration)?,
        })
    }

    pub fn kelvin(&self) -> Kelvin {
        self.kelvin
    }
}

impl Operation for TemperatureCommand {
    fn feature(&self) -> Feature {
        self.feature
    }

    fn params(&self) -> Vec<Value> {
        let mut params = vec![json!(self.kelvin.kelvin())];
        params.extend(transition_params(&self.transition));
        params
    }

    fn feedback(&self, state: &mut DeviceState) {
        state.update(self.feature.target(), |light| light.set_temperature(self.kelvin));
    }
}

/// `set_rgb`: `[0xRRGGBB, effect, duration]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbCommand {
    feature: Feature,
    color: Color,
    transition: Transition,
}

impl RgbCommand {
    pub(crate) fn new(input: &RgbInput) -> Result<Self> {
        let color = Color::create(input.red, input.green, input.blue).ok_or_else(|| {
            Error::invalid_params(
                input.feature,
                format!(
                    "color channels ({}, {}, {}) must be within 0-255",
                    input.red, input.green, input.blue
                ),
            )
        })?;
        Ok(RgbCommand {
            feature: input.feature,
            color,
            transition: transition(input.feature, input.effect, input.duration)?,
        })
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Operation for RgbCommand {
    fn feature(&self) -> Feature {
        self.feature
    }

    fn params(&self) -> Vec<Value> {
        let mut params = vec![json!(self.color.packed())];
        params.extend(transition_params(&self.transition));
        params
    }

    fn feedback(&self, state: &mut DeviceState) {
        state.update(self.feature.target(), |light| light.set_color(self.color));
    }
}

/// `set_hsv`: `[hue, sat, effect, duration]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HsvCommand {
    feature: Feature,
    hue_saturation: HueSaturation,
    transition: Transition,
}

impl HsvCommand {
    pub(crate) fn new(input: &HsvInput) -> Result<Self> {
        let hue_saturation = u16::try_from(input.hue)
            .ok()
            .zip(u8::try_from(input.saturation).ok())
            .and_then(|(hue, sat)| HueSaturation::create(hue, sat))
            .ok_or_else(|| {
                Error::invalid_params(
                    input.feature,
                    format!(
                        "hue {} / saturation {} out of range",
                        input.hue, input.saturation
                    ),
                )
            })?;
        Ok(HsvCommand {
            feature: input.feature,
            hue_saturation,
            transition: transition(input.feature, input.effect, input.duration)?,
        })
    }

    pub fn hue_saturation(&self) -> HueSaturation {
        self.hue_saturation
    }
}

impl Operation for HsvCommand {
    fn feature(&self) -> Feature {
        self.feature
    }

    fn params(&self) -> Vec<Value> {
        let mut params = vec![
            json!(self.hue_saturation.hue()),
            json!(self.hue_saturation.saturation()),
        ];
        params.extend(transition_params(&self.transition));
        params
    }

    fn feedback(&self, state: &mut DeviceState) {
        state.update(self.feature.target(), |light| {
            light.set_hue_saturation(self.hue_saturation)
        });
    }
}
