// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor type names and the accessory metadata derived from them.

use std::fmt;

use crate::error::Error;

/// Manufacturer reported for every sensor accessory.
pub const MANUFACTURER: &str = "Motiv Homebridge Sensors";

/// Name of a sensor kind, e.g. `awake`.
///
/// Never empty. Everything shown to the host (display name, model, serial
/// number) is a pure function of the type and the account user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SensorType(String);

impl SensorType {
    /// The sensor tracking whether the user is awake.
    pub const AWAKE: &'static str = "awake";

    /// Creates a sensor type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSensorType`] if `name` is empty or blank.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidSensorType(name));
        }
        Ok(Self(name))
    }

    /// The `awake` sensor type.
    #[must_use]
    pub fn awake() -> Self {
        Self(Self::AWAKE.to_string())
    }

    /// Returns the type name as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the accessory display name: first letter upper case, the rest lower case.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    /// Returns the model string, e.g. `Motiv awake sensor`.
    #[must_use]
    pub fn model(&self) -> String {
        format!("Motiv {} sensor", self.0)
    }

    /// Returns the serial number for `user_id`, e.g. `awake-u1`.
    #[must_use]
    pub fn serial_number(&self, user_id: &str) -> String {
        format!("{}-{user_id}", self.0.to_lowercase())
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SensorType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awake_metadata() {
        let awake = SensorType::awake();
        assert_eq!(awake.as_str(), "awake");
        assert_eq!(awake.display_name(), "Awake");
        assert_eq!(awake.model(), "Motiv awake sensor");
        assert_eq!(awake.serial_number("u1"), "awake-u1");
    }

    #[test]
    fn display_name_lowercases_the_rest() {
        let sensor = SensorType::new("aSLEEP").unwrap();
        assert_eq!(sensor.display_name(), "Asleep");
    }

    #[test]
    fn serial_number_is_lowercase_type() {
        let sensor = SensorType::new("Awake").unwrap();
        assert_eq!(sensor.serial_number("U1"), "awake-U1");
    }

    #[test]
    fn empty_type_is_rejected() {
        assert!(matches!(
            SensorType::new(""),
            Err(Error::InvalidSensorType(_))
        ));
        assert!(SensorType::new("  ").is_err());
    }

    #[test]
    fn single_letter_type() {
        assert_eq!(SensorType::new("z").unwrap().display_name(), "Z");
    }
}
