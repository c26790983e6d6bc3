//! Feature-tagged command inputs.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::Error;
use crate::feature::{Feature, FeatureGroup};
use crate::types::{Effect, FlowAction, FlowTransition, PowerModeHint, PowerState, Transition};

type Result<T> = std::result::Result<T, Error>;

fn default_duration() -> u64 {
    Transition::DEFAULT_DURATION_MS
}

/// Input for `set_ct_abx` / `bg_set_ct_abx`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemperatureInput {
    pub feature: Feature,
    /// Kelvin, 1700-6500.
    pub ct: u32,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default = "default_duration")]
    pub duration: u64,
}

/// Input for `set_rgb` / `bg_set_rgb`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RgbInput {
    pub feature: Feature,
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default = "default_duration")]
    pub duration: u64,
}

/// Input for `set_hsv` / `bg_set_hsv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HsvInput {
    pub feature: Feature,
    /// Degrees, 0-359.
    pub hue: u32,
    /// Percent, 0-100.
    pub saturation: u32,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default = "default_duration")]
    pub duration: u64,
}

/// Input for `set_bright` / `bg_set_bright`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BrightnessInput {
    pub feature: Feature,
    /// Percent, 1-100.
    pub brightness: u32,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default = "default_duration")]
    pub duration: u64,
}

/// Input for `set_power` / `bg_set_power`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PowerInput {
    pub feature: Feature,
    pub power: PowerState,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default = "default_duration")]
    pub duration: u64,
    #[serde(default)]
    pub mode: Option<PowerModeHint>,
}

/// Input for features that take no parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureOnlyInput {
    pub feature: Feature,
}

/// Input for `start_cf` / `bg_start_cf`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartFlowInput {
    pub feature: Feature,
    /// Number of transitions to play; 0 loops forever.
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub action: FlowAction,
    pub transitions: Vec<FlowTransition>,
}

/// An abstract, feature-tagged instruction for a device.
///
/// The variant decides which fields are present; the `feature` tag inside it
/// must belong to the variant's [`FeatureGroup`], which
/// [`CommandFactory::get`](crate::CommandFactory::get) enforces.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandInput {
    Temperature(TemperatureInput),
    Rgb(RgbInput),
    Hsv(HsvInput),
    Brightness(BrightnessInput),
    Power(PowerInput),
    Toggle(FeatureOnlyInput),
    Default(FeatureOnlyInput),
    StartFlow(StartFlowInput),
    StopFlow(FeatureOnlyInput),
}

impl CommandInput {
    /// The feature tag carried by the input.
    pub fn feature(&self) -> Feature {
        match self {
            CommandInput::Temperature(i) => i.feature,
            CommandInput::Rgb(i) => i.feature,
            CommandInput::Hsv(i) => i.feature,
            CommandInput::Brightness(i) => i.feature,
            CommandInput::Power(i) => i.feature,
            CommandInput::Toggle(i) | CommandInput::Default(i) | CommandInput::StopFlow(i) => {
                i.feature
            }
            CommandInput::StartFlow(i) => i.feature,
        }
    }

    /// The group the input's variant stands for.
    pub fn group(&self) -> FeatureGroup {
        match self {
            CommandInput::Temperature(_) => FeatureGroup::Temperature,
            CommandInput::Rgb(_) => FeatureGroup::Rgb,
            CommandInput::Hsv(_) => FeatureGroup::Hsv,
            CommandInput::Brightness(_) => FeatureGroup::Brightness,
            CommandInput::Power(_) => FeatureGroup::Power,
            CommandInput::Toggle(_) => FeatureGroup::Toggle,
            CommandInput::Default(_) => FeatureGroup::Default,
            CommandInput::StartFlow(_) => FeatureGroup::StartFlow,
            CommandInput::StopFlow(_) => FeatureGroup::StopFlow,
        }
    }

    /// Build an input from a JSON object keyed by `feature`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use yeelight_rs::{CommandInput, Error, Feature};
    ///
    /// let input = CommandInput::from_value(json!({"feature": "bg_set_bright", "brightness": 30})).unwrap();
    /// assert_eq!(input.feature(), Feature::BgSetBright);
    ///
    /// let err = CommandInput::from_value(json!({"feature": "set_music"}));
    /// assert!(matches!(err, Err(Error::UnsupportedFeature(tag)) if tag == "set_music"));
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        let Some(tag) = value.get("feature").and_then(Value::as_str) else {
            let tag = value
                .get("feature")
                .map_or_else(|| "<missing>".to_string(), Value::to_string);
            return Err(Error::UnsupportedFeature(tag));
        };
        let feature =
            Feature::from_str(tag).map_err(|_| Error::UnsupportedFeature(tag.to_string()))?;

        let input = match feature.group() {
            FeatureGroup::Temperature => CommandInput::Temperature(parse(value)?),
            FeatureGroup::Rgb => CommandInput::Rgb(parse(value)?),
            FeatureGroup::Hsv => CommandInput::Hsv(parse(value)?),
            FeatureGroup::Brightness => CommandInput::Brightness(parse(value)?),
            FeatureGroup::Power => CommandInput::Power(parse(value)?),
            FeatureGroup::Toggle => CommandInput::Toggle(parse(value)?),
            FeatureGroup::Default => CommandInput::Default(parse(value)?),
            FeatureGroup::StartFlow => CommandInput::StartFlow(parse(value)?),
            FeatureGroup::StopFlow => CommandInput::StopFlow(parse(value)?),
        };
        Ok(input)
    }

    /// Parse an input from a JSON string. See [`CommandInput::from_value`].
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(Error::JsonLoad)?;
        Self::from_value(value)
    }

    /// Set a color temperature on the main light.
    pub fn temperature(ct: u32) -> Self {
        CommandInput::Temperature(TemperatureInput {
            feature: Feature::SetCtAbx,
            ct,
            effect: Effect::default(),
            duration: default_duration(),
        })
    }

    /// Set an RGB color on the main light.
    pub fn rgb(red: u32, green: u32, blue: u32) -> Self {
        CommandInput::Rgb(RgbInput {
            feature: Feature::SetRgb,
            red,
            green,
            blue,
            effect: Effect::default(),
            duration: default_duration(),
        })
    }

    /// Set hue and saturation on the main light.
    pub fn hsv(hue: u32, saturation: u32) -> Self {
        CommandInput::Hsv(HsvInput {
            feature: Feature::SetHsv,
            hue,
            saturation,
            effect: Effect::default(),
            duration: default_duration(),
        })
    }

    /// Set the brightness of the main light.
    pub fn brightness(brightness: u32) -> Self {
        CommandInput::Brightness(BrightnessInput {
            feature: Feature::SetBright,
            brightness,
            effect: Effect::default(),
            duration: default_duration(),
        })
    }

    /// Switch the main light on or off.
    pub fn power(power: PowerState) -> Self {
        CommandInput::Power(PowerInput {
            feature: Feature::SetPower,
            power,
            effect: Effect::default(),
            duration: default_duration(),
            mode: None,
        })
    }

    /// Toggle the main light.
    pub fn toggle() -> Self {
        CommandInput::Toggle(FeatureOnlyInput {
            feature: Feature::Toggle,
        })
    }

    /// Save the current state of the main light as its power-on default.
    pub fn set_default() -> Self {
        CommandInput::Default(FeatureOnlyInput {
            feature: Feature::SetDefault,
        })
    }

    /// Start a color flow on the main light.
    pub fn start_flow(count: u32, action: FlowAction, transitions: Vec<FlowTransition>) -> Self {
        CommandInput::StartFlow(StartFlowInput {
            feature: Feature::StartCf,
            count,
            action,
            transitions,
        })
    }

    /// Stop the color flow on the main light.
    pub fn stop_flow() -> Self {
        CommandInput::StopFlow(FeatureOnlyInput {
            feature: Feature::StopCf,
        })
    }

    /// Replace the feature tag, e.g. to address the background light.
    ///
    /// The tag is not checked here; a tag outside the variant's group is
    /// rejected when the command is built.
    ///
    /// ```
    /// use yeelight_rs::{CommandInput, Feature};
    ///
    /// let input = CommandInput::toggle().with_feature(Feature::DevToggle);
    /// assert_eq!(input.feature(), Feature::DevToggle);
    /// ```
    pub fn with_feature(mut self, feature: Feature) -> Self {
        match &mut self {
            CommandInput::Temperature(i) => i.feature = feature,
            CommandInput::Rgb(i) => i.feature = feature,
            CommandInput::Hsv(i) => i.feature = feature,
            CommandInput::Brightness(i) => i.feature = feature,
            CommandInput::Power(i) => i.feature = feature,
            CommandInput::Toggle(i) | CommandInput::Default(i) | CommandInput::StopFlow(i) => {
                i.feature = feature
            }
            CommandInput::StartFlow(i) => i.feature = feature,
        }
        self
    }

    /// Replace the transition of inputs that have one; others are unchanged.
    pub fn with_transition(mut self, effect: Effect, duration: u64) -> Self {
        match &mut self {
            CommandInput::Temperature(i) => (i.effect, i.duration) = (effect, duration),
            CommandInput::Rgb(i) => (i.effect, i.duration) = (effect, duration),
            CommandInput::Hsv(i) => (i.effect, i.duration) = (effect, duration),
            CommandInput::Brightness(i) => (i.effect, i.duration) = (effect, duration),
            CommandInput::Power(i) => (i.effect, i.duration) = (effect, duration),
            CommandInput::Toggle(_)
            | CommandInput::Default(_)
            | CommandInput::StartFlow(_)
            | CommandInput::StopFlow(_) => {}
        }
        self
    }
}

fn parse<T: for<'de> Deserialize<'de>>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(Error::JsonLoad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_defaults() {
        let input = CommandInput::from_value(json!({"feature": "set_ct_abx", "ct": 2700})).unwrap();
        assert_eq!(
            input,
            CommandInput::Temperature(TemperatureInput {
                feature: Feature::SetCtAbx,
                ct: 2700,
                effect: Effect::Smooth,
                duration: 500,
            })
        );
    }

    #[test]
    fn test_from_value_every_group() {
        let cases = [
            (json!({"feature": "bg_set_rgb", "red": 1, "green": 2, "blue": 3}), FeatureGroup::Rgb),
            (json!({"feature": "set_hsv", "hue": 10, "saturation": 20}), FeatureGroup::Hsv),
            (json!({"feature": "set_power", "power": "off", "mode": 5}), FeatureGroup::Power),
            (json!({"feature": "dev_toggle"}), FeatureGroup::Toggle),
            (json!({"feature": "bg_set_default"}), FeatureGroup::Default),
            (
                json!({"feature": "start_cf", "transitions": [{"duration": 100, "mode": 7}]}),
                FeatureGroup::StartFlow,
            ),
            (json!({"feature": "bg_stop_cf"}), FeatureGroup::StopFlow),
        ];
        for (value, group) in cases {
            let input = CommandInput::from_value(value).unwrap();
            assert_eq!(input.group(), group);
            assert_eq!(input.feature().group(), group);
        }
    }

    #[test]
    fn test_unknown_or_missing_feature() {
        assert_eq!(
            CommandInput::from_value(json!({"feature": "get_prop"})),
            Err(Error::UnsupportedFeature("get_prop".into()))
        );
        assert_eq!(
            CommandInput::from_value(json!({"ct": 2700})),
            Err(Error::UnsupportedFeature("<missing>".into()))
        );
        assert_eq!(
            CommandInput::from_value(json!({"feature": 3})),
            Err(Error::UnsupportedFeature("3".into()))
        );
    }

    #[test]
    fn test_missing_field_is_json_error() {
        let err = CommandInput::from_json(r#"{"feature": "set_rgb", "red": 1}"#).unwrap_err();
        assert!(matches!(err, Error::JsonLoad(_)));
    }

    #[test]
    fn test_with_transition_skips_parameterless() {
        let toggle = CommandInput::toggle().with_transition(Effect::Sudden, 0);
        assert_eq!(toggle, CommandInput::toggle());

        let CommandInput::Power(power) =
            CommandInput::power(PowerState::On).with_transition(Effect::Sudden, 0)
        else {
            panic!("expected power input");
        };
        assert_eq!((power.effect, power.duration), (Effect::Sudden, 0));
    }
}
