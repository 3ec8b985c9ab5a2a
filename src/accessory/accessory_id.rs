// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory identifier type.

use std::fmt;

use uuid::Uuid;

use super::SensorType;

/// Stable identifier of an accessory.
///
/// Sensor accessories derive theirs from the key returned by
/// [`AccessoryId::sensor_key`], so the same account and sensor type always
/// map to the same accessory across restarts.
///
/// # Examples
///
/// ```
/// use motiv_bridge::accessory::{AccessoryId, SensorType};
///
/// let awake = SensorType::awake();
/// assert_eq!(AccessoryId::sensor_key("u1", &awake), "Motiv_u1_awake");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct AccessoryId(Uuid);

impl AccessoryId {
    /// Creates an identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Returns the key a sensor accessory's UUID is generated from.
    #[must_use]
    pub fn sensor_key(user_id: &str, sensor: &SensorType) -> String {
        format!("Motiv_{user_id}_{sensor}")
    }
}

impl fmt::Debug for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = &self.0.to_string()[..8];
        write!(f, "AccessoryId({short}...)")
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AccessoryId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<AccessoryId> for Uuid {
    fn from(id: AccessoryId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_key_changes_with_inputs() {
        let awake = SensorType::awake();
        let asleep = SensorType::new("asleep").unwrap();

        assert_eq!(
            AccessoryId::sensor_key("u1", &awake),
            AccessoryId::sensor_key("u1", &awake)
        );
        assert_ne!(
            AccessoryId::sensor_key("u1", &awake),
            AccessoryId::sensor_key("u2", &awake)
        );
        assert_ne!(
            AccessoryId::sensor_key("u1", &awake),
            AccessoryId::sensor_key("u1", &asleep)
        );
    }

    #[test]
    fn debug_format() {
        let id = AccessoryId::from_uuid(Uuid::nil());
        assert_eq!(format!("{id:?}"), "AccessoryId(00000000...)");
    }

    #[test]
    fn display_format() {
        let uuid = Uuid::parse_str("a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8").unwrap();
        let id = AccessoryId::from_uuid(uuid);
        assert_eq!(id.to_string(), "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8");
    }

    #[test]
    fn uuid_round_trip_through_from() {
        let uuid = Uuid::parse_str("a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8").unwrap();
        let id: AccessoryId = uuid.into();
        assert_eq!(Uuid::from(id), uuid);
    }
}
