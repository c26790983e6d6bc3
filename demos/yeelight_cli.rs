//! CLI application for controlling Yeelight devices.
//!
//! Run with: cargo run --example yeelight_cli -- --help

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::{Parser, Subcommand};
use yeelight_rs::{
    Color, CommandInput, Config, Device, Effect, Feature, FlowAction, FlowTransition, Kelvin,
    PowerState, discover_devices,
};

#[derive(Parser)]
#[command(name = "yeelight-cli")]
#[command(about = "Control Yeelight smart lights from the command line", long_about = None)]
struct Cli {
    /// IP address of the device (not required for discover command)
    #[arg(short, long, global = true)]
    ip: Option<IpAddr>,

    /// Control port of the device
    #[arg(short, long, global = true, default_value_t = Device::PORT)]
    port: u16,

    /// Address the background light instead of the main one
    #[arg(short, long, global = true)]
    background: bool,

    /// Transition duration in milliseconds; 0 switches instantly
    #[arg(short, long, global = true, default_value = "500")]
    duration: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover all Yeelight devices on the network
    Discover {
        /// Discovery timeout in seconds (default: 3)
        #[arg(short, long, default_value = "3")]
        timeout: u64,
    },

    /// Query and print the current state of the device
    Status,

    /// Turn the light on
    On,

    /// Turn the light off
    Off,

    /// Toggle the light; with --all, toggle both lights of the fixture
    Toggle {
        #[arg(long)]
        all: bool,
    },

    /// Set RGB color (0-255 for each component)
    Color { red: u32, green: u32, blue: u32 },

    /// Set hue (0-359) and saturation (0-100)
    Hsv { hue: u32, saturation: u32 },

    /// Set brightness (1-100)
    Brightness { level: u32 },

    /// Set color temperature in Kelvin (1700-6500)
    Temperature { kelvin: u32 },

    /// Save the current state as the power-on default
    Default,

    /// Pulse between red and blue; 0 repeats forever
    Flow {
        #[arg(short, long, default_value = "0")]
        count: u32,
    },

    /// Stop a running color flow
    Stop,
}

const STATUS_PROPS: [&str; 8] = [
    "name", "power", "bright", "ct", "rgb", "hue", "sat", "color_mode",
];

fn transition(input: CommandInput, duration: u64) -> CommandInput {
    if duration == 0 {
        input.with_transition(Effect::Sudden, 0)
    } else {
        input.with_transition(Effect::Smooth, duration)
    }
}

/// The background twin of a main-light feature.
fn background(feature: Feature) -> Feature {
    match feature {
        Feature::SetCtAbx => Feature::BgSetCtAbx,
        Feature::SetRgb => Feature::BgSetRgb,
        Feature::SetHsv => Feature::BgSetHsv,
        Feature::SetBright => Feature::BgSetBright,
        Feature::SetPower => Feature::BgSetPower,
        Feature::Toggle => Feature::BgToggle,
        Feature::SetDefault => Feature::BgSetDefault,
        Feature::StartCf => Feature::BgStartCf,
        Feature::StopCf => Feature::BgStopCf,
        other => other,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::new();

    let input = match cli.command {
        Commands::Discover { timeout } => {
            println!("Discovering Yeelight devices (timeout: {}s)...", timeout);
            let devices = discover_devices(&config, Duration::from_secs(timeout)).await?;
            if devices.is_empty() {
                println!("No devices found on the network.");
            } else {
                println!("\nFound {} device(s):", devices.len());
                for found in devices {
                    println!(
                        "  {:21}  {}  {:10}  fw {}",
                        found.addr.to_string(),
                        found.id,
                        found.model.as_deref().unwrap_or("?"),
                        found.firmware.as_deref().unwrap_or("?"),
                    );
                }
            }
            return Ok(());
        }

        Commands::Status => None,
        Commands::On => Some(transition(CommandInput::power(PowerState::On), cli.duration)),
        Commands::Off => Some(transition(CommandInput::power(PowerState::Off), cli.duration)),
        Commands::Toggle { all: true } => {
            Some(CommandInput::toggle().with_feature(Feature::DevToggle))
        }
        Commands::Toggle { all: false } => Some(CommandInput::toggle()),
        Commands::Color { red, green, blue } => Some(transition(
            CommandInput::rgb(red, green, blue),
            cli.duration,
        )),
        Commands::Hsv { hue, saturation } => {
            Some(transition(CommandInput::hsv(hue, saturation), cli.duration))
        }
        Commands::Brightness { level } => {
            Some(transition(CommandInput::brightness(level), cli.duration))
        }
        Commands::Temperature { kelvin } => {
            Some(transition(CommandInput::temperature(kelvin), cli.duration))
        }
        Commands::Default => Some(CommandInput::set_default()),
        Commands::Flow { count } => {
            let step = cli.duration.max(50);
            let warm = Kelvin::create(2700).ok_or("invalid temperature")?;
            Some(CommandInput::start_flow(
                count,
                FlowAction::Recover,
                vec![
                    FlowTransition::color(step, Color::rgb(255, 0, 0), 100),
                    FlowTransition::color(step, Color::rgb(0, 0, 255), 100),
                    FlowTransition::temperature(step, warm, 50),
                    FlowTransition::sleep(step),
                ],
            ))
        }
        Commands::Stop => Some(CommandInput::stop_flow()),
    };

    let ip = cli
        .ip
        .ok_or("IP address is required for this command. Use --ip <IP>")?;
    let device = Device::new(SocketAddr::new(ip, cli.port), &config);

    match input {
        Some(input) => {
            let input = if cli.background {
                let feature = background(input.feature());
                input.with_feature(feature)
            } else {
                input
            };
            println!("Sending {} to {}...", input.feature(), device.addr());
            match device.send(input).await {
                Ok(result) => println!("Device answered {:?}", result.result),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        None => {
            println!("Getting status for device at {}...", device.addr());
            device.get_props(&STATUS_PROPS).await?;
            let bg: Vec<String> = STATUS_PROPS[1..].iter().map(|p| format!("bg_{p}")).collect();
            let bg: Vec<&str> = bg.iter().map(String::as_str).collect();
            // Single-light fixtures answer empty strings for bg_ props.
            device.get_props(&bg).await?;
            println!("{}", serde_json::to_string_pretty(&device.state())?);
        }
    }

    device.disconnect().await;
    Ok(())
}
