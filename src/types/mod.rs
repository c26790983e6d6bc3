//! Value types for light control parameters.

mod brightness;
mod color;
mod color_mode;
mod effect;
mod flow;
mod hue_saturation;
mod kelvin;
mod power;

pub use brightness::Brightness;
pub use color::Color;
pub use color_mode::ColorMode;
pub use effect::{Effect, Transition};
pub use flow::{FlowAction, FlowMode, FlowTransition, flow_expression};
pub use hue_saturation::HueSaturation;
pub use kelvin::Kelvin;
pub use power::{PowerModeHint, PowerState};
