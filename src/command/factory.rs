use log::trace;

use super::{
    BrightnessCommand, Command, CommandInput, CommandKind, DefaultCommand, HsvCommand,
    PowerCommand, RgbCommand, StartFlowCommand, StopFlowCommand, TemperatureCommand,
    ToggleCommand,
};
use crate::device::Device;
use crate::errors::Error;
use crate::feature::FeatureGroup;

type Result<T> = std::result::Result<T, Error>;

/// Builds commands for one device.
///
/// # Example
///
/// ```
/// use std::net::SocketAddr;
/// use yeelight_rs::{CommandInput, CommandKind, Config, Device, Feature};
///
/// let device = Device::new("192.168.1.20:55443".parse::<SocketAddr>().unwrap(), &Config::new());
/// let command = device
///     .factory()
///     .get(CommandInput::rgb(255, 0, 0).with_feature(Feature::BgSetRgb))
///     .unwrap();
///
/// assert!(matches!(command.kind(), CommandKind::Rgb(_)));
/// assert_eq!(command.data().method, Feature::BgSetRgb);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CommandFactory<'a> {
    device: &'a Device,
}

impl<'a> CommandFactory<'a> {
    pub fn new(device: &'a Device) -> Self {
        CommandFactory { device }
    }

    /// Build the command matching the input's feature.
    ///
    /// Fails with [`Error::UnsupportedFeature`] when the input's tag does not
    /// belong to the group its variant stands for, and with
    /// [`Error::InvalidCommandParams`] when the variant rejects the values.
    pub fn get(&self, input: CommandInput) -> Result<Command<'a>> {
        let feature = input.feature();
        trace!("building {} command", feature);

        let kind = match (feature.group(), &input) {
            (FeatureGroup::Temperature, CommandInput::Temperature(i)) => {
                CommandKind::Temperature(TemperatureCommand::new(i)?)
            }
            (FeatureGroup::Rgb, CommandInput::Rgb(i)) => CommandKind::Rgb(RgbCommand::new(i)?),
            (FeatureGroup::Hsv, CommandInput::Hsv(i)) => CommandKind::Hsv(HsvCommand::new(i)?),
            (FeatureGroup::Brightness, CommandInput::Brightness(i)) => {
                CommandKind::Brightness(BrightnessCommand::new(i)?)
            }
            (FeatureGroup::Power, CommandInput::Power(i)) => {
                CommandKind::Power(PowerCommand::new(i)?)
            }
            (FeatureGroup::Toggle, CommandInput::Toggle(i)) => {
                CommandKind::Toggle(ToggleCommand::new(i))
            }
            (FeatureGroup::Default, CommandInput::Default(i)) => {
                CommandKind::Default(DefaultCommand::new(i))
            }
            (FeatureGroup::StartFlow, CommandInput::StartFlow(i)) => {
                CommandKind::StartFlow(StartFlowCommand::new(i)?)
            }
            (FeatureGroup::StopFlow, CommandInput::StopFlow(i)) => {
                CommandKind::StopFlow(StopFlowCommand::new(i))
            }
            _ => return Err(Error::UnsupportedFeature(feature.to_string())),
        };

        Ok(Command::new(self.device, kind))
    }
}
