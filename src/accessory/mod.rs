// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory records and the set that tracks them.
//!
//! An [`Accessory`] is what the host persists and shows to its clients. Sensor
//! accessories carry an [`OccupancySensor`] service whose [`ReadHandler`] the
//! host invokes whenever a client asks for the current state.
//!
//! Ownership is shared: the platform builds and configures an accessory, the
//! host keeps it across restarts and hands it back through the restoration
//! hook. Per accessory the lifecycle is simply
//! [`Unregistered`](RegistrationState::Unregistered) →
//! [`Registered`](RegistrationState::Registered) → `Unregistered`.

mod accessory_id;
mod accessory_set;
mod platform_accessory;
mod sensor_type;

pub use accessory_id::AccessoryId;
pub use accessory_set::{AccessorySet, RegistrationState};
pub use platform_accessory::{
    Accessory, AccessoryInformation, OccupancySensor, ReadFuture, ReadHandler,
};
pub use sensor_type::{MANUFACTURER, SensorType};
