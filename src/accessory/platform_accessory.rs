// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory records exchanged with the host.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::AccessoryId;
use crate::error::Error;

/// Future returned by a [`ReadHandler`].
pub type ReadFuture = Pin<Box<dyn Future<Output = Result<bool, Error>> + Send>>;

/// Callback invoked each time the host queries the occupancy state.
///
/// Every call starts one fresh read; nothing is cached between calls.
pub type ReadHandler = Arc<dyn Fn() -> ReadFuture + Send + Sync>;

/// Descriptive metadata shown by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInformation {
    /// Manufacturer name.
    pub manufacturer: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Serial number.
    pub serial_number: Option<String>,
}

/// The occupancy sensor service of an accessory.
#[derive(Clone)]
pub struct OccupancySensor {
    name: String,
    read_handler: Option<ReadHandler>,
}

impl OccupancySensor {
    /// Creates a service with no read handler.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            read_handler: None,
        }
    }

    /// Returns the service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the service name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the read handler.
    pub fn set_read_handler(&mut self, handler: ReadHandler) {
        self.read_handler = Some(handler);
    }

    /// Returns true once a read handler is attached.
    #[must_use]
    pub fn has_read_handler(&self) -> bool {
        self.read_handler.is_some()
    }
}

impl std::fmt::Debug for OccupancySensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccupancySensor")
            .field("name", &self.name)
            .field("has_read_handler", &self.has_read_handler())
            .finish()
    }
}

/// An accessory known to the host.
///
/// Clones share the same read handler, so the copy handed to the host and
/// the copy kept in the platform's accessory set answer reads identically.
///
/// # Examples
///
/// ```
/// use motiv_bridge::accessory::{Accessory, AccessoryId};
///
/// let mut accessory = Accessory::new("Awake", AccessoryId::from_uuid(uuid::Uuid::nil()));
/// accessory.occupancy_sensor_or_insert("Awake");
/// assert!(accessory.occupancy_sensor().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Accessory {
    id: AccessoryId,
    display_name: String,
    information: AccessoryInformation,
    occupancy: Option<OccupancySensor>,
}

impl Accessory {
    /// Creates a bare accessory with no services, as the host restores it from cache.
    #[must_use]
    pub fn new(display_name: impl Into<String>, id: AccessoryId) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            information: AccessoryInformation::default(),
            occupancy: None,
        }
    }

    /// Returns the accessory identifier.
    #[must_use]
    pub fn id(&self) -> AccessoryId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Sets the display name.
    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    /// Returns the descriptive metadata.
    #[must_use]
    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    /// Replaces the descriptive metadata.
    pub fn set_information(&mut self, information: AccessoryInformation) {
        self.information = information;
    }

    /// Returns the occupancy sensor service, if present.
    #[must_use]
    pub fn occupancy_sensor(&self) -> Option<&OccupancySensor> {
        self.occupancy.as_ref()
    }

    /// Returns the occupancy sensor service, renaming it to `name` if it
    /// exists and adding it otherwise.
    pub fn occupancy_sensor_or_insert(&mut self, name: &str) -> &mut OccupancySensor {
        let service = self
            .occupancy
            .get_or_insert_with(|| OccupancySensor::new(name));
        service.set_name(name);
        service
    }

    /// Reads the occupancy state through the attached read handler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandlerMissing`] if no handler is attached, or the
    /// handler's own error when the read fails.
    pub fn read_occupancy(&self) -> ReadFuture {
        match self.occupancy.as_ref().and_then(|s| s.read_handler.as_ref()) {
            Some(handler) => handler(),
            None => {
                let accessory = self.display_name.clone();
                Box::pin(async move { Err::<bool, Error>(Error::HandlerMissing { accessory }) })
            }
        }
    }

    /// Reads the occupancy state and reports the outcome to `callback`.
    ///
    /// The read runs as a task on the current tokio runtime; the callback is
    /// invoked exactly once, with the occupancy value or the read error.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn on_get<F>(&self, callback: F) -> tokio::task::JoinHandle<()>
    where
        F: FnOnce(Result<bool, Error>) + Send + 'static,
    {
        let read = self.read_occupancy();
        tokio::spawn(async move {
            callback(read.await);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn accessory() -> Accessory {
        Accessory::new("Awake", AccessoryId::from_uuid(Uuid::nil()))
    }

    fn constant_handler(value: bool) -> ReadHandler {
        Arc::new(move || -> ReadFuture { Box::pin(async move { Ok::<bool, Error>(value) }) })
    }

    #[test]
    fn new_accessory_has_no_services() {
        let accessory = accessory();
        assert_eq!(accessory.display_name(), "Awake");
        assert!(accessory.occupancy_sensor().is_none());
        assert_eq!(accessory.information(), &AccessoryInformation::default());
    }

    #[test]
    fn occupancy_sensor_or_insert_renames_existing_service() {
        let mut accessory = accessory();
        accessory
            .occupancy_sensor_or_insert("awake")
            .set_read_handler(constant_handler(true));

        let service = accessory.occupancy_sensor_or_insert("Awake");
        assert_eq!(service.name(), "Awake");
        assert!(service.has_read_handler());
    }

    #[tokio::test]
    async fn read_without_handler_fails() {
        let accessory = accessory();
        let result = accessory.read_occupancy().await;
        assert!(matches!(result, Err(Error::HandlerMissing { .. })));
    }

    #[tokio::test]
    async fn clones_share_the_handler() {
        let mut accessory = accessory();
        accessory
            .occupancy_sensor_or_insert("Awake")
            .set_read_handler(constant_handler(true));

        let copy = accessory.clone();
        assert!(copy.read_occupancy().await.unwrap());
    }

    #[tokio::test]
    async fn on_get_reports_through_callback() {
        let mut accessory = accessory();
        accessory
            .occupancy_sensor_or_insert("Awake")
            .set_read_handler(constant_handler(false));

        let (tx, rx) = tokio::sync::oneshot::channel();
        accessory
            .on_get(move |result| {
                let _ = tx.send(result);
            })
            .await
            .unwrap();

        assert!(!rx.await.unwrap().unwrap());
    }
}
