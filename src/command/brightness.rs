use serde_json::{Value, json};

use super::{Operation, transition, transition_params};
use crate::command::input::BrightnessInput;
use crate::errors::Error;
use crate::feature::Feature;
use crate::state::DeviceState;
use crate::types::{Brightness, Transition};

/// `set_bright`: `[percent, effect, duration]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BrightnessCommand {
    feature: Feature,
    brightness: Brightness,
    transition: Transition,
}

impl BrightnessCommand {
    pub(crate) fn new(input: &BrightnessInput) -> Result<Self, Error> {
        let brightness = u8::try_from(input.brightness)
            .ok()
            .and_then(Brightness::create)
            .ok_or_else(|| {
                Error::invalid_params(
                    input.feature,
                    format!("brightness {} must be within 1-100", input.brightness),
                )
            })?;
        Ok(BrightnessCommand {
            feature: input.feature,
            brightness,
            transition: transition(input.feature, input.effect, input.duration)?,
        })
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }
}

impl Operation for BrightnessCommand {
    fn feature(&self) -> Feature {
        self.feature
    }

    fn params(&self) -> Vec<Value> {
        let mut params = vec![json!(self.brightness.value())];
        params.extend(transition_params(&self.transition));
        params
    }

    fn feedback(&self, state: &mut DeviceState) {
        state.update(self.feature.target(), |light| {
            light.set_brightness(self.brightness)
        });
    }
}
