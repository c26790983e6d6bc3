//! # yeelight_rs
//!
//! An async Rust library for controlling Yeelight smart lights over the LAN
//! control protocol.
//!
//! This crate provides a **runtime-agnostic** async API to find Yeelight
//! devices on your local network and drive them: power, brightness, color
//! temperature, RGB and HSV colors, color flows, and the background light of
//! dual-light fixtures.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use yeelight_rs::{CommandInput, Config, discover_devices};
//!
//! // Works with any async runtime!
//! async fn control_lights() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new();
//!     for found in discover_devices(&config, Duration::from_secs(3)).await? {
//!         let device = found.into_device(&config);
//!         device.send(CommandInput::rgb(0, 0, 255)).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Commands
//!
//! Every request starts as a [`CommandInput`]: a feature tag plus the
//! parameters for it. A device's [`CommandFactory`] validates the input and
//! turns it into a [`Command`] carrying a fresh correlation id:
//!
//! ```
//! use std::net::SocketAddr;
//! use yeelight_rs::{CommandInput, Config, Device, Feature};
//!
//! let device = Device::new(SocketAddr::from(([192, 168, 1, 20], 55443)), &Config::new());
//! let command = device
//!     .factory()
//!     .get(CommandInput::brightness(40).with_feature(Feature::BgSetBright))
//!     .unwrap();
//!
//! let data = command.data();
//! assert_eq!(data.method.to_string(), "bg_set_bright");
//! assert_eq!(data.params, vec![40.into(), "smooth".into(), 500.into()] as Vec<serde_json::Value>);
//!
//! // Once the device acknowledged it, record the change.
//! command.feedback();
//! assert_eq!(device.state().background().brightness().unwrap().value(), 40);
//! ```
//!
//! [`Device::send`] does all of this in one call: it writes the command,
//! waits for the answer with the same id and applies the feedback.
//!
//! ## Features
//!
//! - **Runtime Agnostic**: Works with tokio, async-std, or smol async runtimes
//! - **Discovery**: Find devices with [`discover_devices`]
//! - **Colors**: [`Color`], [`HueSaturation`] and [`Kelvin`] for white
//! - **Transitions**: Sudden or smooth changes with [`Effect`]
//! - **Color Flows**: Chains of [`FlowTransition`]s
//! - **Cached State**: Last known settings in [`DeviceState`], kept current
//!   by acknowledged commands and `props` notifications
//!
//! ## Communication
//!
//! Discovery uses a multicast search on `239.255.255.250:1982`. Control runs
//! over one persistent TCP connection per device (port 55443), one JSON
//! object per line. "LAN Control" must be enabled for the device in the
//! Yeelight app.
//!
//! ## Runtime Selection
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! yeelight-rs = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using async-std
//!
//! ```toml
//! [dependencies]
//! yeelight-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//! async-std = { version = "1.12", features = ["attributes"] }
//! ```
//!
//! ### Using smol
//!
//! ```toml
//! [dependencies]
//! yeelight-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! smol = "2"
//! ```

mod command;
mod config;
mod connection;
mod device;
mod discovery;
mod errors;
mod feature;
pub mod network;
mod response;
pub mod runtime;
mod state;
mod types;

// Re-export public API
pub use command::{
    BrightnessCommand, BrightnessInput, Command, CommandData, CommandFactory, CommandInput,
    CommandKind, DefaultCommand, FeatureOnlyInput, HsvCommand, HsvInput, Operation, PowerCommand,
    PowerInput, RgbCommand, RgbInput, StartFlowCommand, StartFlowInput, StopFlowCommand,
    TemperatureCommand, TemperatureInput, ToggleCommand,
};
pub use config::{Config, ConfigParams};
pub use device::Device;
pub use discovery::{DiscoveredDevice, discover_devices, parse_discovery_response};
pub use errors::Error;
pub use feature::{Feature, FeatureGroup, LightTarget};
pub use response::CommandResult;
pub use state::{DeviceState, LightState};
pub use types::{
    Brightness, Color, ColorMode, Effect, FlowAction, FlowMode, FlowTransition, HueSaturation,
    Kelvin, PowerModeHint, PowerState, Transition, flow_expression,
};
