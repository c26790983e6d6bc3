//! Color flow commands.

use serde_json::{Value, json};

use super::Operation;
use crate::command::input::{FeatureOnlyInput, StartFlowInput};
use crate::errors::Error;
use crate::feature::Feature;
use crate::state::DeviceState;
use crate::types::{FlowAction, FlowTransition, flow_expression};

/// `start_cf`: `[count, action, "duration,mode,value,brightness,..."]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StartFlowCommand {
    feature: Feature,
    count: u32,
    action: FlowAction,
    transitions: Vec<FlowTransition>,
}

impl StartFlowCommand {
    pub(crate) fn new(input: &StartFlowInput) -> Result<Self, Error> {
        if input.transitions.is_empty() {
            return Err(Error::invalid_params(
                input.feature,
                "a flow needs at least one transition",
            ));
        }
        for (i, step) in input.transitions.iter().enumerate() {
            step.validate()
                .map_err(|reason| Error::invalid_params(input.feature, format!("step {i}: {reason}")))?;
        }
        Ok(StartFlowCommand {
            feature: input.feature,
            count: input.count,
            action: input.action,
            transitions: input.transitions.clone(),
        })
    }

    pub fn transitions(&self) -> &[FlowTransition] {
        &self.transitions
    }
}

impl Operation for StartFlowCommand {
    fn feature(&self) -> Feature {
        self.feature
    }

    fn params(&self) -> Vec<Value> {
        vec![
            json!(self.count),
            json!(self.action.value()),
            json!(flow_expression(&self.transitions)),
        ]
    }

    fn feedback(&self, state: &mut DeviceState) {
        state.update(self.feature.target(), |light| light.set_flowing(true));
    }
}

/// `stop_cf`: no params.
#[derive(Debug, Clone, PartialEq)]
pub struct StopFlowCommand {
    feature: Feature,
}

impl StopFlowCommand {
    pub(crate) fn new(input: &FeatureOnlyInput) -> Self {
        StopFlowCommand {
            feature: input.feature,
        }
    }
}

impl Operation for StopFlowCommand {
    fn feature(&self) -> Feature {
        self.feature
    }

    fn params(&self) -> Vec<Value> {
        Vec::new()
    }

    fn feedback(&self, state: &mut DeviceState) {
        state.update(self.feature.target(), |light| light.set_flowing(false));
    }
}
