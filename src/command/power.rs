//! Power commands: explicit on/off and toggle.

use serde_json::{Value, json};

use super::{Operation, transition, transition_params};
use crate::command::input::{FeatureOnlyInput, PowerInput};
use crate::errors::Error;
use crate::feature::Feature;
use crate::state::{DeviceState, LightState};
use crate::types::{PowerModeHint, PowerState, Transition};

/// `set_power`: `["on"|"off", effect, duration, mode?]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerCommand {
    feature: Feature,
    power: PowerState,
    transition: Transition,
    mode: Option<PowerModeHint>,
}

impl PowerCommand {
    pub(crate) fn new(input: &PowerInput) -> Result<Self, Error> {
        Ok(PowerCommand {
            feature: input.feature,
            power: input.power,
            transition: transition(input.feature, input.effect, input.duration)?,
            mode: input.mode,
        })
    }

    pub fn power(&self) -> PowerState {
        self.power
    }

    pub fn mode(&self) -> Option<PowerModeHint> {
        self.mode
    }
}

impl Operation for PowerCommand {
    fn feature(&self) -> Feature {
        self.feature
    }

    fn params(&self) -> Vec<Value> {
        let mut params = vec![json!(self.power)];
        params.extend(transition_params(&self.transition));
        if let Some(mode) = self.mode {
            params.push(json!(mode.value()));
        }
        params
    }

    fn feedback(&self, state: &mut DeviceState) {
        let on = self.power.is_on();
        state.update(self.feature.target(), |light| light.set_power(on));
    }
}

/// `toggle`, `bg_toggle` and `dev_toggle`: no params.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleCommand {
    feature: Feature,
}

impl ToggleCommand {
    pub(crate) fn new(input: &FeatureOnlyInput) -> Self {
        ToggleCommand {
            feature: input.feature,
        }
    }
}

impl Operation for ToggleCommand {
    fn feature(&self) -> Feature {
        self.feature
    }

    fn params(&self) -> Vec<Value> {
        Vec::new()
    }

    fn feedback(&self, state: &mut DeviceState) {
        state.update(self.feature.target(), LightState::toggle_power);
    }
}
