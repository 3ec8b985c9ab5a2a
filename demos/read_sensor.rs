// SPDX-License-Identifier: MPL-2.0

//! Demo program: launch the platform against a console host and read the
//! awake sensor once.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example read_sensor -- <config.json> <api-base-url>
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example read_sensor -- ~/.homebridge/motiv.json https://api.example.com
//! ```
//!
//! The config file holds the platform block written by the login tool:
//!
//! ```json
//! {"platform": "Motiv", "account": {"userId": "u1", "accessToken": "...", "sessionExpiry": "2030-01-01T00:00:00Z"}}
//! ```

use std::env;

use motiv_bridge::accessory::Accessory;
use motiv_bridge::host::{HostApi, HostError, PluginIdentity};
use motiv_bridge::{AccountApiConfig, Platform, PlatformConfig};

/// Host that only prints what it is asked to do.
struct ConsoleHost;

impl HostApi for ConsoleHost {
    fn register_platform_accessories(
        &self,
        plugin: &PluginIdentity,
        accessories: &[Accessory],
    ) -> Result<(), HostError> {
        for accessory in accessories {
            println!(
                "[{plugin}] register {} ({})",
                accessory.display_name(),
                accessory.id()
            );
        }
        Ok(())
    }

    fn unregister_platform_accessories(
        &self,
        plugin: &PluginIdentity,
        accessories: &[Accessory],
    ) -> Result<(), HostError> {
        for accessory in accessories {
            println!(
                "[{plugin}] unregister {} ({})",
                accessory.display_name(),
                accessory.id()
            );
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <config.json> <api-base-url>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example read_sensor -- motiv.json https://api.example.com");
        std::process::exit(1);
    }

    let config = PlatformConfig::from_file(&args[1])?;
    let api = AccountApiConfig::new(&args[2]);
    let platform = Platform::new(config, ConsoleHost, api);

    platform.did_finish_launching()?;

    for accessory in platform.accessories().snapshot() {
        let info = accessory.information();
        println!(
            "{} - serial {}",
            accessory.display_name(),
            info.serial_number.as_deref().unwrap_or("?")
        );

        match accessory.read_occupancy().await {
            Ok(occupied) => println!("  occupied: {occupied}"),
            Err(e) => println!("  read failed: {e}"),
        }
    }

    Ok(())
}
