// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `motiv_bridge` - Motiv ring sleep data as home-automation occupancy sensors.
//!
//! This library exposes a Motiv account's "awake" state as an occupancy
//! sensor accessory of a home-automation host. A sensor reads as occupied
//! while the account's most recent wake event is at or after the time of
//! the read.
//!
//! # Supported Features
//!
//! - **Startup checks**: Missing account or expired session halts the
//!   platform with one logged error and a hint to re-run the login tool
//! - **Accessory synchronization**: Cached accessories are reused by their
//!   stable id, new ones registered once, stale ones unregistered
//! - **Fresh reads**: Every host read is one account API call; no caching,
//!   no retry
//! - **HTTP client**: Default account API client over HTTPS (`http` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use motiv_bridge::{AccountApiConfig, Platform, PlatformConfig};
//! use motiv_bridge::accessory::Accessory;
//! use motiv_bridge::host::{HostApi, HostError, PluginIdentity};
//!
//! struct Host;
//!
//! impl HostApi for Host {
//!     fn register_platform_accessories(
//!         &self,
//!         plugin: &PluginIdentity,
//!         accessories: &[Accessory],
//!     ) -> Result<(), HostError> {
//!         println!("{plugin}: registering {} accessories", accessories.len());
//!         Ok(())
//!     }
//!
//!     fn unregister_platform_accessories(
//!         &self,
//!         _plugin: &PluginIdentity,
//!         _accessories: &[Accessory],
//!     ) -> Result<(), HostError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> motiv_bridge::Result<()> {
//!     let config = PlatformConfig::from_file("motiv.json")?;
//!     let platform = Platform::new(config, Host, AccountApiConfig::new("https://api.example.com"));
//!
//!     // Cached accessories would be handed over here first
//!     platform.did_finish_launching()?;
//!
//!     for accessory in platform.accessories().snapshot() {
//!         let occupied = accessory.read_occupancy().await?;
//!         println!("{}: occupied={occupied}", accessory.display_name());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The library logs through [`tracing`] and never installs a subscriber.
//! Fatal startup errors are logged at `error` level exactly once.

pub mod accessory;
pub mod account;
pub mod clock;
pub mod config;
pub mod error;
pub mod host;
mod platform;
pub mod session;

#[cfg(feature = "http")]
pub use account::{AccountApiConfig, HttpAccountClient, HttpAccountClientBuilder};
pub use account::{AccountClient, AccountClientFactory, WakeTime, is_occupied};
pub use accessory::{Accessory, AccessoryId, AccessorySet, RegistrationState, SensorType};
pub use clock::{Clock, FixedClock, SystemClock, Timestamp};
pub use config::{AccountConfig, PlatformConfig};
pub use error::{ConfigError, Error, FailureKind, ParseError, ProtocolError, Result};
pub use host::{HostApi, HostError, PluginIdentity};
pub use platform::Platform;
pub use session::{LOGIN_HINT, SessionGuard};
