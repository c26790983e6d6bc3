//! Cached device state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::feature::LightTarget;
use crate::types::{Brightness, Color, ColorMode, HueSaturation, Kelvin};

/// Last known settings of one light of a fixture.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct LightState {
    power: Option<bool>,
    brightness: Option<Brightness>,
    temperature: Option<Kelvin>,
    color: Option<Color>,
    hue_saturation: Option<HueSaturation>,
    color_mode: Option<ColorMode>,
    flowing: Option<bool>,
}

impl LightState {
    /// Whether the light is on, if known.
    pub fn power(&self) -> Option<bool> {
        self.power
    }

    pub fn brightness(&self) -> Option<&Brightness> {
        self.brightness.as_ref()
    }

    pub fn temperature(&self) -> Option<&Kelvin> {
        self.temperature.as_ref()
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn hue_saturation(&self) -> Option<&HueSaturation> {
        self.hue_saturation.as_ref()
    }

    pub fn color_mode(&self) -> Option<ColorMode> {
        self.color_mode
    }

    /// Whether a color flow is running, if known.
    pub fn flowing(&self) -> Option<bool> {
        self.flowing
    }

    pub(crate) fn set_power(&mut self, on: bool) {
        self.power = Some(on);
    }

    pub(crate) fn toggle_power(&mut self) {
        self.power = self.power.map(|on| !on);
    }

    pub(crate) fn set_brightness(&mut self, brightness: Brightness) {
        self.brightness = Some(brightness);
    }

    pub(crate) fn set_temperature(&mut self, kelvin: Kelvin) {
        self.temperature = Some(kelvin);
        self.color_mode = Some(ColorMode::Temperature);
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = Some(color);
        self.color_mode = Some(ColorMode::Rgb);
    }

    pub(crate) fn set_hue_saturation(&mut self, hs: HueSaturation) {
        self.hue_saturation = Some(hs);
        self.color_mode = Some(ColorMode::Hsv);
    }

    pub(crate) fn set_flowing(&mut self, flowing: bool) {
        self.flowing = Some(flowing);
    }

    /// Apply one device property. Unknown or malformed values are ignored.
    fn apply_prop(&mut self, prop: &str, value: &Value) {
        match prop {
            "power" => {
                if let Some(s) = value.as_str() {
                    self.power = Some(s == "on");
                }
            }
            "bright" => {
                if let Some(b) = prop_u64(value)
                    .and_then(|v| u8::try_from(v).ok())
                    .and_then(Brightness::create)
                {
                    self.brightness = Some(b);
                }
            }
            "ct" => {
                if let Some(k) = prop_u64(value)
                    .and_then(|v| u32::try_from(v).ok())
                    .and_then(Kelvin::create)
                {
                    self.temperature = Some(k);
                }
            }
            "rgb" => {
                if let Some(c) = prop_u64(value)
                    .and_then(|v| u32::try_from(v).ok())
                    .and_then(Color::from_packed)
                {
                    self.color = Some(c);
                }
            }
            "hue" | "sat" => {
                let current = self.hue_saturation.unwrap_or_default();
                let Some(v) = prop_u64(value) else { return };
                let updated = if prop == "hue" {
                    u16::try_from(v)
                        .ok()
                        .and_then(|hue| HueSaturation::create(hue, current.saturation()))
                } else {
                    u8::try_from(v)
                        .ok()
                        .and_then(|sat| HueSaturation::create(current.hue(), sat))
                };
                if updated.is_some() {
                    self.hue_saturation = updated;
                }
            }
            "color_mode" | "lmode" => {
                if let Some(mode) = prop_u64(value)
                    .and_then(|v| u8::try_from(v).ok())
                    .and_then(|v| ColorMode::try_from(v).ok())
                {
                    self.color_mode = Some(mode);
                }
            }
            "flowing" => {
                if let Some(v) = prop_u64(value) {
                    self.flowing = Some(v == 1);
                }
            }
            _ => {}
        }
    }
}

/// Cached state of a whole fixture: the main light and, on dual-light
/// fixtures, the background light.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeviceState {
    name: Option<String>,
    /// Model reported by discovery, e.g. `color` or `ceiling4`.
    model: Option<String>,
    main: LightState,
    background: LightState,
}

impl DeviceState {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub(crate) fn set_model(&mut self, model: Option<String>) {
        if model.is_some() {
            self.model = model;
        }
    }

    pub fn main(&self) -> &LightState {
        &self.main
    }

    pub fn background(&self) -> &LightState {
        &self.background
    }

    /// Apply `f` to every light addressed by `target`.
    pub(crate) fn update(&mut self, target: LightTarget, mut f: impl FnMut(&mut LightState)) {
        match target {
            LightTarget::Main => f(&mut self.main),
            LightTarget::Background => f(&mut self.background),
            LightTarget::Device => {
                f(&mut self.main);
                f(&mut self.background);
            }
        }
    }

    /// Apply a map of device properties, as carried by `props`
    /// notifications and discovery answers.
    ///
    /// `bg_`-prefixed properties update the background light.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use yeelight_rs::DeviceState;
    ///
    /// let mut state = DeviceState::default();
    /// state.apply_props(json!({"power": "on", "bright": "42", "bg_power": "off"}).as_object().unwrap());
    /// assert_eq!(state.main().power(), Some(true));
    /// assert_eq!(state.main().brightness().unwrap().value(), 42);
    /// assert_eq!(state.background().power(), Some(false));
    /// ```
    pub fn apply_props(&mut self, props: &serde_json::Map<String, Value>) {
        for (prop, value) in props {
            if prop == "name" {
                if let Some(name) = value.as_str().filter(|n| !n.is_empty()) {
                    self.name = Some(name.to_string());
                }
            } else if let Some(bg) = prop.strip_prefix("bg_") {
                self.background.apply_prop(bg, value);
            } else {
                self.main.apply_prop(prop, value);
            }
        }
    }
}

/// Devices report numbers either as JSON numbers or as decimal strings.
fn prop_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_apply_props_string_and_number() {
        let mut state = DeviceState::default();
        state.apply_props(&props(json!({
            "ct": 4000,
            "rgb": "16711680",
            "hue": "120",
            "sat": 80,
            "color_mode": "2",
            "flowing": "1",
            "name": "desk"
        })));

        let main = state.main();
        assert_eq!(main.temperature().unwrap().kelvin(), 4000);
        assert_eq!(main.color(), Some(&Color::rgb(255, 0, 0)));
        assert_eq!(main.hue_saturation(), HueSaturation::create(120, 80).as_ref());
        assert_eq!(main.color_mode(), Some(ColorMode::Temperature));
        assert_eq!(main.flowing(), Some(true));
        assert_eq!(state.name(), Some("desk"));
    }

    #[test]
    fn test_invalid_props_ignored() {
        let mut state = DeviceState::default();
        state.apply_props(&props(json!({"bright": "0", "ct": "abc", "unknown": 1})));
        assert_eq!(state, DeviceState::default());
    }

    #[test]
    fn test_background_lmode() {
        let mut state = DeviceState::default();
        state.apply_props(&props(json!({"bg_lmode": 1, "bg_rgb": 255})));
        assert_eq!(state.background().color_mode(), Some(ColorMode::Rgb));
        assert_eq!(state.background().color(), Some(&Color::rgb(0, 0, 255)));
        assert_eq!(state.main(), &LightState::default());
    }

    #[test]
    fn test_device_target_updates_both() {
        let mut state = DeviceState::default();
        state.update(LightTarget::Device, |light| light.set_power(true));
        state.update(LightTarget::Background, LightState::toggle_power);
        assert_eq!(state.main().power(), Some(true));
        assert_eq!(state.background().power(), Some(false));
    }

    #[test]
    fn test_toggle_unknown_power_stays_unknown() {
        let mut light = LightState::default();
        light.toggle_power();
        assert_eq!(light.power(), None);
    }

    #[test]
    fn test_model_is_kept_when_unknown() {
        let mut state = DeviceState::default();
        state.set_model(Some("ceiling4".into()));
        state.set_model(None);
        assert_eq!(state.model(), Some("ceiling4"));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["model"], "ceiling4");
    }
}
