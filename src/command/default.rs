use serde_json::Value;

use super::Operation;
use crate::command::input::FeatureOnlyInput;
use crate::feature::Feature;
use crate::state::DeviceState;

/// `set_default`: saves the current settings as the power-on state.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultCommand {
    feature: Feature,
}

impl DefaultCommand {
    pub(crate) fn new(input: &FeatureOnlyInput) -> Self {
        DefaultCommand {
            feature: input.feature,
        }
    }
}

impl Operation for DefaultCommand {
    fn feature(&self) -> Feature {
        self.feature
    }

    fn params(&self) -> Vec<Value> {
        Vec::new()
    }

    // Nothing observable changes locally.
    fn feedback(&self, _state: &mut DeviceState) {}
}
