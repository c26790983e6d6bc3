//! Discover all Yeelight devices on the network and set them to red.
//!
//! This example demonstrates:
//! - Discovery of Yeelight devices on the local network
//! - Setting all discovered lights to red color
//!
//! Run with: cargo run --example discover_and_set_red

use std::time::Duration;
use yeelight_rs::{CommandInput, Config, Feature, discover_devices};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new();
    println!(
        "Discovering Yeelight devices from {}...",
        config.discovery_host()
    );

    let devices = discover_devices(&config, Duration::from_secs(3)).await?;

    if devices.is_empty() {
        println!("No devices found on the network.");
        return Ok(());
    }

    println!("Found {} device(s):", devices.len());
    for found in &devices {
        println!(
            "  - {} ({}) at {}",
            found.id,
            found.model.as_deref().unwrap_or("unknown model"),
            found.addr
        );
    }

    println!("\nSetting all lights to red...");

    for found in devices {
        if !found.supports(Feature::SetRgb) {
            println!("  - Skipping {}: no RGB support", found.addr);
            continue;
        }

        let device = found.into_device(&config);
        match device.send(CommandInput::rgb(255, 0, 0)).await {
            Ok(_) => println!("  ✓ Successfully set {} to red", device.addr()),
            Err(e) => eprintln!("  ✗ Failed to set {} to red: {}", device.addr(), e),
        }
    }

    println!("\nDone!");
    Ok(())
}
