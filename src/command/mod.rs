//! Commands: validated, id-tagged instructions ready for the wire.
//!
//! A [`CommandInput`] is turned into a [`Command`] by the
//! [`CommandFactory`] of a [`Device`]. The command owns a correlation id
//! drawn from that device, produces its payload through [`Command::data`],
//! and, once the device has accepted it, updates the device's cached state
//! through [`Command::feedback`].

mod brightness;
mod color;
mod default;
mod factory;
mod flow;
mod input;
mod power;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::device::Device;
use crate::errors::Error;
use crate::feature::Feature;
use crate::state::DeviceState;
use crate::types::{Effect, Transition};

pub use brightness::BrightnessCommand;
pub use color::{HsvCommand, RgbCommand, TemperatureCommand};
pub use default::DefaultCommand;
pub use factory::CommandFactory;
pub use flow::{StartFlowCommand, StopFlowCommand};
pub use input::{
    BrightnessInput, CommandInput, FeatureOnlyInput, HsvInput, PowerInput, RgbInput,
    StartFlowInput, TemperatureInput,
};
pub use power::{PowerCommand, ToggleCommand};

/// The contract every command variant fulfils.
pub trait Operation: fmt::Debug + Send + Sync {
    /// The resolved feature, sent as the wire method.
    fn feature(&self) -> Feature;

    /// Positional parameters, in the order the device expects them.
    fn params(&self) -> Vec<Value>;

    /// Update cached state to reflect an accepted command.
    fn feedback(&self, state: &mut DeviceState);
}

/// Wire payload of a command: one JSON object per line on the socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandData {
    pub id: u64,
    pub method: Feature,
    pub params: Vec<Value>,
}

/// The concrete variant behind a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    Temperature(TemperatureCommand),
    Rgb(RgbCommand),
    Hsv(HsvCommand),
    Brightness(BrightnessCommand),
    Power(PowerCommand),
    Toggle(ToggleCommand),
    Default(DefaultCommand),
    StartFlow(StartFlowCommand),
    StopFlow(StopFlowCommand),
}

impl CommandKind {
    pub fn operation(&self) -> &dyn Operation {
        match self {
            CommandKind::Temperature(c) => c,
            CommandKind::Rgb(c) => c,
            CommandKind::Hsv(c) => c,
            CommandKind::Brightness(c) => c,
            CommandKind::Power(c) => c,
            CommandKind::Toggle(c) => c,
            CommandKind::Default(c) => c,
            CommandKind::StartFlow(c) => c,
            CommandKind::StopFlow(c) => c,
        }
    }
}

/// One outbound instruction bound to the device it was built for.
///
/// Commands are short-lived: build one per request, send its
/// [`data`](Command::data), then call [`feedback`](Command::feedback) once
/// the device has acknowledged it.
pub struct Command<'a> {
    id: u64,
    kind: CommandKind,
    device: &'a Device,
}

impl<'a> Command<'a> {
    pub(crate) fn new(device: &'a Device, kind: CommandKind) -> Self {
        Command {
            id: device.next_id(),
            kind,
            device,
        }
    }

    /// Correlation id, unique per device connection.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn feature(&self) -> Feature {
        self.kind.operation().feature()
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    /// The payload to send. Pure: every call returns the same value.
    pub fn data(&self) -> CommandData {
        let operation = self.kind.operation();
        CommandData {
            id: self.id,
            method: operation.feature(),
            params: operation.params(),
        }
    }

    /// Apply the command's effect to the device's cached state.
    ///
    /// Call this only after the device acknowledged the command.
    pub fn feedback(&self) {
        self.device
            .update_state(|state| self.kind.operation().feedback(state));
    }
}

impl fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

fn transition(feature: Feature, effect: Effect, duration: u64) -> Result<Transition, Error> {
    Transition::create(effect, duration).ok_or_else(|| {
        Error::invalid_params(
            feature,
            format!("{effect} transition of {duration} ms is too short"),
        )
    })
}

fn transition_params(transition: &Transition) -> [Value; 2] {
    [json!(transition.effect()), json!(transition.duration_ms())]
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};

    use super::*;
    use crate::config::Config;
    use crate::types::{Color, FlowAction, FlowTransition, Kelvin, PowerModeHint, PowerState};

    fn device() -> Device {
        Device::new(
            SocketAddr::from((Ipv4Addr::LOCALHOST, 55443)),
            &Config::new(),
        )
    }

    #[test]
    fn test_power_on_feedback() {
        let device = device();
        let command = device
            .factory()
            .get(CommandInput::power(PowerState::On))
            .unwrap();

        let data = command.data();
        assert_eq!(data.method.to_string(), "set_power");
        assert_eq!(data.params[0], json!("on"));
        assert_eq!(device.state().main().power(), None);

        command.feedback();
        assert_eq!(device.state().main().power(), Some(true));
        assert_eq!(device.state().background().power(), None);
    }

    #[test]
    fn test_data_is_stable_and_ids_increase() {
        let device = device();
        let first = device.factory().get(CommandInput::toggle()).unwrap();
        let second = device.factory().get(CommandInput::toggle()).unwrap();

        assert_eq!(first.data(), first.data());
        assert!(second.id() > first.id());
        assert_ne!(first.data(), second.data());
    }

    #[test]
    fn test_params_reproduce_input() {
        let device = device();
        let factory = device.factory();

        let ct = factory
            .get(CommandInput::temperature(2700).with_transition(Effect::Sudden, 0))
            .unwrap();
        assert_eq!(ct.data().params, vec![json!(2700), json!("sudden"), json!(0)]);

        let rgb = factory.get(CommandInput::rgb(255, 128, 1)).unwrap();
        assert_eq!(
            rgb.data().params,
            vec![json!(0xFF8001), json!("smooth"), json!(500)]
        );

        let hsv = factory
            .get(CommandInput::hsv(359, 100).with_transition(Effect::Smooth, 1200))
            .unwrap();
        assert_eq!(
            hsv.data().params,
            vec![json!(359), json!(100), json!("smooth"), json!(1200)]
        );

        let bright = factory.get(CommandInput::brightness(1)).unwrap();
        assert_eq!(
            bright.data().params,
            vec![json!(1), json!("smooth"), json!(500)]
        );

        let power = factory
            .get(CommandInput::Power(PowerInput {
                feature: Feature::BgSetPower,
                power: PowerState::Off,
                effect: Effect::Smooth,
                duration: 800,
                mode: Some(PowerModeHint::NightLight),
            }))
            .unwrap();
        let data = power.data();
        assert_eq!(data.method, Feature::BgSetPower);
        assert_eq!(
            data.params,
            vec![json!("off"), json!("smooth"), json!(800), json!(5)]
        );

        let flow = factory
            .get(CommandInput::start_flow(
                4,
                FlowAction::TurnOff,
                vec![
                    FlowTransition::color(1000, Color::rgb(0, 0, 255), 50),
                    FlowTransition::temperature(500, Kelvin::create(5000).unwrap(), -1),
                ],
            ))
            .unwrap();
        assert_eq!(
            flow.data().params,
            vec![json!(4), json!(2), json!("1000,1,255,50,500,2,5000,-1")]
        );
    }

    #[test]
    fn test_parameterless_commands() {
        let device = device();
        for input in [
            CommandInput::toggle(),
            CommandInput::set_default(),
            CommandInput::stop_flow(),
        ] {
            let command = device.factory().get(input).unwrap();
            assert!(command.data().params.is_empty());
        }
    }

    #[test]
    fn test_wire_json() {
        let device = device();
        let command = device.factory().get(CommandInput::brightness(42)).unwrap();
        let line = serde_json::to_string(&command.data()).unwrap();
        assert_eq!(
            line,
            format!(
                r#"{{"id":{},"method":"set_bright","params":[42,"smooth",500]}}"#,
                command.id()
            )
        );
    }

    #[test]
    fn test_out_of_range_params_rejected() {
        let device = device();
        let factory = device.factory();
        let invalid = [
            CommandInput::rgb(256, 0, 0),
            CommandInput::temperature(1699),
            CommandInput::temperature(6501),
            CommandInput::hsv(360, 0),
            CommandInput::hsv(0, 101),
            CommandInput::brightness(0),
            CommandInput::brightness(101),
            CommandInput::brightness(10).with_transition(Effect::Smooth, 29),
            CommandInput::start_flow(0, FlowAction::Recover, vec![]),
            CommandInput::start_flow(0, FlowAction::Recover, vec![FlowTransition::sleep(10)]),
        ];
        for input in invalid {
            let result = factory.get(input.clone());
            assert!(
                matches!(result, Err(Error::InvalidCommandParams { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejected_input_does_not_consume_id() {
        let device = device();
        let factory = device.factory();
        let first = factory.get(CommandInput::toggle()).unwrap();
        assert!(factory.get(CommandInput::brightness(0)).is_err());
        let second = factory.get(CommandInput::toggle()).unwrap();
        assert_eq!(second.id(), first.id() + 1);
    }

    #[test]
    fn test_feedback_per_variant() {
        let device = device();
        let factory = device.factory();

        factory
            .get(CommandInput::temperature(3000).with_feature(Feature::BgSetCtAbx))
            .unwrap()
            .feedback();
        factory.get(CommandInput::rgb(1, 2, 3)).unwrap().feedback();
        factory.get(CommandInput::brightness(70)).unwrap().feedback();
        factory
            .get(CommandInput::start_flow(
                0,
                FlowAction::Stay,
                vec![FlowTransition::sleep(100)],
            ))
            .unwrap()
            .feedback();

        let state = device.state();
        assert_eq!(state.background().temperature().unwrap().kelvin(), 3000);
        assert_eq!(state.main().color(), Some(&Color::rgb(1, 2, 3)));
        assert_eq!(state.main().brightness().unwrap().value(), 70);
        assert_eq!(state.main().flowing(), Some(true));

        factory.get(CommandInput::stop_flow()).unwrap().feedback();
        assert_eq!(device.state().main().flowing(), Some(false));
    }

    #[test]
    fn test_toggle_feedback_targets() {
        let device = device();
        let factory = device.factory();
        factory
            .get(CommandInput::power(PowerState::On).with_feature(Feature::SetPower))
            .unwrap()
            .feedback();
        factory
            .get(CommandInput::power(PowerState::On).with_feature(Feature::BgSetPower))
            .unwrap()
            .feedback();

        factory
            .get(CommandInput::toggle().with_feature(Feature::BgToggle))
            .unwrap()
            .feedback();
        assert_eq!(device.state().main().power(), Some(true));
        assert_eq!(device.state().background().power(), Some(false));

        factory
            .get(CommandInput::toggle().with_feature(Feature::DevToggle))
            .unwrap()
            .feedback();
        assert_eq!(device.state().main().power(), Some(false));
        assert_eq!(device.state().background().power(), Some(true));
    }

    #[test]
    fn test_default_feedback_is_noop() {
        let device = device();
        let before = device.state();
        device
            .factory()
            .get(CommandInput::set_default())
            .unwrap()
            .feedback();
        assert_eq!(device.state(), before);
    }
}
