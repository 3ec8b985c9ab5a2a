// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The Motiv platform: startup checks and accessory synchronization.
//!
//! A [`Platform`] is driven entirely by the host:
//!
//! 1. The host replays its accessory cache through
//!    [`configure_accessory`](Platform::configure_accessory), before or after
//!    launch.
//! 2. The host signals readiness once through
//!    [`did_finish_launching`](Platform::did_finish_launching). The session is
//!    validated, the `awake` sensor is created or reused, and cached
//!    accessories that no longer match a sensor are dropped.
//! 3. The host reads sensors through each accessory's read handler. Every
//!    read is one fresh account API call.

use std::collections::HashMap;
use std::slice;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::account::{AccountClient, AccountClientFactory, is_occupied};
use crate::accessory::{
    Accessory, AccessoryId, AccessoryInformation, AccessorySet, MANUFACTURER, ReadFuture,
    ReadHandler, RegistrationState, SensorType,
};
use crate::clock::{Clock, SystemClock, Timestamp};
use crate::config::{AccountConfig, PlatformConfig};
use crate::error::Error;
use crate::host::{HostApi, PluginIdentity};
use crate::session::{LOGIN_HINT, SessionGuard};

/// A platform instance bound to one host and one Motiv account.
///
/// # Examples
///
/// ```no_run
/// use motiv_bridge::account::AccountApiConfig;
/// use motiv_bridge::config::PlatformConfig;
/// # use motiv_bridge::host::{HostApi, HostError, PluginIdentity};
/// # use motiv_bridge::accessory::Accessory;
/// # struct Host;
/// # impl HostApi for Host {
/// #     fn register_platform_accessories(&self, _: &PluginIdentity, _: &[Accessory]) -> Result<(), HostError> { Ok(()) }
/// #     fn unregister_platform_accessories(&self, _: &PluginIdentity, _: &[Accessory]) -> Result<(), HostError> { Ok(()) }
/// # }
/// use motiv_bridge::Platform;
///
/// # async fn run() -> motiv_bridge::Result<()> {
/// let config = PlatformConfig::from_file("motiv.json")?;
/// let api = AccountApiConfig::new("https://api.example.com");
/// let platform = Platform::new(config, Host, api);
///
/// platform.did_finish_launching()?;
/// for accessory in platform.accessories().snapshot() {
///     let occupied = accessory.read_occupancy().await?;
///     println!("{}: {occupied}", accessory.display_name());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Platform<H, C>
where
    H: HostApi,
    C: AccountClient,
{
    config: PlatformConfig,
    host: H,
    client: Option<Arc<C>>,
    plugin: PluginIdentity,
    clock: Arc<dyn Clock>,
    accessories: AccessorySet,
    /// Sensors this instance manages, by accessory id.
    ///
    /// An id is reserved here as soon as its sensor is configured, even if
    /// the host then refuses the registration: a later restore of that id is
    /// adopted rather than treated as stale.
    sensors: RwLock<HashMap<AccessoryId, SensorType>>,
    ready_signalled: AtomicBool,
    launched: AtomicBool,
}

impl<H, C> Platform<H, C>
where
    H: HostApi,
    C: AccountClient,
{
    /// Creates a platform from its configuration, the host handle and a
    /// factory for the account client.
    ///
    /// The client is only built when the configuration has an account
    /// section. A factory failure is logged and leaves the platform without
    /// a client, which halts launch with [`Error::AuthNotReady`].
    pub fn new<F>(config: PlatformConfig, host: H, factory: F) -> Self
    where
        F: AccountClientFactory<Client = C>,
    {
        let client = config
            .account
            .as_ref()
            .and_then(|account| match factory.create(account) {
                Ok(client) => Some(Arc::new(client)),
                Err(err) => {
                    tracing::warn!(
                        platform = %config.display_name(),
                        error = %err,
                        "Failed to create account client"
                    );
                    None
                }
            });

        Self {
            config,
            host,
            client,
            plugin: PluginIdentity::default(),
            clock: Arc::new(SystemClock),
            accessories: AccessorySet::new(),
            sensors: RwLock::new(HashMap::new()),
            ready_signalled: AtomicBool::new(false),
            launched: AtomicBool::new(false),
        }
    }

    /// Replaces the clock used for the session check and for reads.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replaces the package and plugin names used with the host.
    #[must_use]
    pub fn with_plugin_identity(mut self, plugin: PluginIdentity) -> Self {
        self.plugin = plugin;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Returns the host handle.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the plugin identity used with the host.
    #[must_use]
    pub fn plugin_identity(&self) -> &PluginIdentity {
        &self.plugin
    }

    /// Returns the account client, if one was created.
    #[must_use]
    pub fn client(&self) -> Option<&Arc<C>> {
        self.client.as_ref()
    }

    /// Returns the accessory set.
    #[must_use]
    pub fn accessories(&self) -> &AccessorySet {
        &self.accessories
    }

    /// Returns a copy of the accessory with `id`.
    #[must_use]
    pub fn accessory(&self, id: AccessoryId) -> Option<Accessory> {
        self.accessories.get(id)
    }

    /// Returns whether the accessory with `id` is currently registered.
    #[must_use]
    pub fn registration_state(&self, id: AccessoryId) -> RegistrationState {
        self.accessories.state(id)
    }

    /// Returns true once launch went through the session check.
    #[must_use]
    pub fn is_launched(&self) -> bool {
        self.launched.load(Ordering::Acquire)
    }

    /// Returns the accessory id for a sensor of `user_id`.
    ///
    /// Pure function of its inputs: the host derives the UUID from
    /// [`AccessoryId::sensor_key`].
    #[must_use]
    pub fn sensor_accessory_id(&self, user_id: &str, sensor: &SensorType) -> AccessoryId {
        AccessoryId::from_uuid(
            self.host
                .generate_uuid(&AccessoryId::sensor_key(user_id, sensor)),
        )
    }

    // =========================================================================
    // Host hooks
    // =========================================================================

    /// Accepts an accessory restored from the host's cache.
    ///
    /// May be called any number of times, before or after launch. Restoring
    /// an id that is already known keeps the existing entry. After launch,
    /// an accessory matching a managed sensor gets its read handler attached,
    /// and one that matches none is unregistered instead of kept.
    pub fn configure_accessory(&self, mut accessory: Accessory) {
        let id = accessory.id();
        tracing::info!(
            accessory_id = %id,
            name = %accessory.display_name(),
            "Restoring accessory from cache"
        );

        if !self.is_launched() {
            if !self.accessories.insert_if_absent(accessory) {
                tracing::debug!(accessory_id = %id, "Accessory already restored");
            }
            return;
        }

        if self.accessories.contains(id) {
            tracing::debug!(accessory_id = %id, "Accessory already known");
            return;
        }

        let sensor = self.sensors.read().get(&id).cloned();
        match (sensor, self.config.account.as_ref(), self.client.as_ref()) {
            (Some(sensor), Some(account), Some(client)) => {
                self.attach_sensor(&mut accessory, &account.user_id, client, &sensor);
                self.accessories.insert_if_absent(accessory);
            }
            _ => self.unregister_stale(slice::from_ref(&accessory)),
        }
    }

    /// Handles the host's one-time readiness signal.
    ///
    /// Validates the session, then creates or reuses the `awake` sensor
    /// accessory and drops stale cached ones. A fatal startup error is
    /// logged once with the login hint and returned; no accessory is created
    /// and cached ones are left untouched. Creation failures are logged and
    /// do not fail launch.
    ///
    /// Only the first signal is acted on, whatever its outcome. Later ones
    /// are ignored and return `Ok(())`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingConfig`] if the configuration has no account.
    /// - [`Error::SessionExpired`] if the session is not valid at launch.
    /// - [`Error::AuthNotReady`] if the account client has no usable
    ///   credentials.
    pub fn did_finish_launching(&self) -> Result<(), Error> {
        if self.ready_signalled.swap(true, Ordering::AcqRel) {
            tracing::warn!(platform = %self.config.display_name(), "Ignoring repeated ready signal");
            return Ok(());
        }

        let now = self.clock.now();
        let account = match self.check_ready(now) {
            Ok(ready) => ready,
            Err(err) => {
                tracing::error!(
                    platform = %self.config.display_name(),
                    error = %err,
                    "Cannot start platform: {err}. {LOGIN_HINT}"
                );
                return Err(err);
            }
        };

        let configured = [SensorType::awake()];
        self.reserve_sensors(account, &configured);
        self.launched.store(true, Ordering::Release);
        tracing::info!(
            platform = %self.config.display_name(),
            user_id = %account.user_id,
            "Platform launched"
        );
        self.setup(account, &configured);
        Ok(())
    }

    // =========================================================================
    // Accessory management
    // =========================================================================

    /// Creates the accessory for `sensor_type`, or reuses the cached one with
    /// the same id, and returns its id.
    ///
    /// A new accessory is registered with the host exactly once. A reused
    /// one is already known to the host and only gets its metadata and read
    /// handler attached. The id stays reserved for the sensor even when the
    /// host refuses the registration.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSensorType`] if `sensor_type` is blank.
    /// - [`Error::MissingConfig`] if there is no account section.
    /// - [`Error::AuthNotReady`] if there is no account client.
    /// - [`Error::Host`] if the host refuses the registration.
    pub fn add_accessory(&self, sensor_type: &str) -> Result<AccessoryId, Error> {
        let sensor = SensorType::new(sensor_type)?;
        let account = self.config.account.as_ref().ok_or(Error::MissingConfig)?;
        let client = self.client.as_ref().ok_or(Error::AuthNotReady)?;

        let id = self.sensor_accessory_id(&account.user_id, &sensor);
        self.sensors.write().insert(id, sensor.clone());

        if let Some(mut cached) = self.accessories.get(id) {
            self.attach_sensor(&mut cached, &account.user_id, client, &sensor);
            self.accessories.upsert(cached);
            tracing::info!(accessory_id = %id, sensor = %sensor, "Reusing cached accessory");
            return Ok(id);
        }

        let accessory = self.create_sensor_accessory(account, client, &sensor, id);
        self.host
            .register_platform_accessories(&self.plugin, slice::from_ref(&accessory))?;
        self.accessories.insert_if_absent(accessory);
        tracing::info!(accessory_id = %id, sensor = %sensor, "Registered new accessory");
        Ok(id)
    }

    /// Removes `accessory` from the set and unregisters it from the host.
    ///
    /// `None` is a no-op: nothing is removed and the host is not called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Host`] if the host refuses the request. The accessory
    /// is removed from the set regardless.
    pub fn remove_accessory(&self, accessory: Option<&Accessory>) -> Result<(), Error> {
        let Some(accessory) = accessory else {
            return Ok(());
        };

        let id = accessory.id();
        self.accessories.remove(id);
        self.sensors.write().remove(&id);
        self.host
            .unregister_platform_accessories(&self.plugin, slice::from_ref(accessory))?;
        tracing::info!(accessory_id = %id, name = %accessory.display_name(), "Removed accessory");
        Ok(())
    }

    fn check_ready(&self, now: Timestamp) -> Result<&AccountConfig, Error> {
        let account = SessionGuard::check(&self.config, now)?;
        match &self.client {
            Some(client) if !client.needs_auth() => Ok(account),
            _ => Err(Error::AuthNotReady),
        }
    }

    /// Records the configured sensors so restores racing the launch are
    /// adopted instead of unregistered.
    fn reserve_sensors(&self, account: &AccountConfig, configured: &[SensorType]) {
        let mut sensors = self.sensors.write();
        for sensor in configured {
            sensors.insert(
                self.sensor_accessory_id(&account.user_id, sensor),
                sensor.clone(),
            );
        }
    }

    fn setup(&self, account: &AccountConfig, configured: &[SensorType]) {
        tracing::debug!(user_id = %account.user_id, "Setting up sensor accessories");

        for sensor in configured {
            if let Err(err) = self.add_accessory(sensor.as_str()) {
                tracing::error!(sensor = %sensor, error = %err, "Failed to add accessory");
            }
        }

        let stale: Vec<Accessory> = {
            let sensors = self.sensors.read();
            self.accessories
                .ids()
                .into_iter()
                .filter(|id| !sensors.contains_key(id))
                .filter_map(|id| self.accessories.remove(id))
                .collect()
        };
        if !stale.is_empty() {
            self.unregister_stale(&stale);
        }
    }

    fn create_sensor_accessory(
        &self,
        account: &AccountConfig,
        client: &Arc<C>,
        sensor: &SensorType,
        id: AccessoryId,
    ) -> Accessory {
        let mut accessory = Accessory::new(sensor.display_name(), id);
        self.attach_sensor(&mut accessory, &account.user_id, client, sensor);
        accessory
    }

    fn attach_sensor(
        &self,
        accessory: &mut Accessory,
        user_id: &str,
        client: &Arc<C>,
        sensor: &SensorType,
    ) {
        let name = sensor.display_name();
        accessory.set_display_name(name.clone());
        accessory.set_information(AccessoryInformation {
            manufacturer: Some(MANUFACTURER.to_string()),
            model: Some(sensor.model()),
            serial_number: Some(sensor.serial_number(user_id)),
        });
        accessory
            .occupancy_sensor_or_insert(&name)
            .set_read_handler(self.read_handler(Arc::clone(client), sensor.clone()));
    }

    fn unregister_stale(&self, stale: &[Accessory]) {
        for accessory in stale {
            tracing::info!(
                accessory_id = %accessory.id(),
                name = %accessory.display_name(),
                "Removing stale cached accessory"
            );
        }
        if let Err(err) = self
            .host
            .unregister_platform_accessories(&self.plugin, stale)
        {
            tracing::error!(count = stale.len(), error = %err, "Failed to unregister stale accessories");
        }
    }

    fn read_handler(&self, client: Arc<C>, sensor: SensorType) -> ReadHandler {
        let clock = Arc::clone(&self.clock);
        Arc::new(move || -> ReadFuture {
            let client = Arc::clone(&client);
            let clock = Arc::clone(&clock);
            let sensor = sensor.clone();
            Box::pin(async move {
                let now = clock.now();
                tracing::debug!(sensor = %sensor, "Reading occupancy");
                match client.last_awakening().await {
                    Ok(last_wake) => {
                        let occupied = is_occupied(last_wake, now);
                        tracing::debug!(
                            sensor = %sensor,
                            last_wake = %last_wake,
                            occupied,
                            "Occupancy read"
                        );
                        Ok(occupied)
                    }
                    Err(source) => {
                        tracing::error!(
                            sensor = %sensor,
                            kind = ?source.kind(),
                            error = %source,
                            "Occupancy read failed"
                        );
                        Err(Error::Read {
                            sensor: sensor.to_string(),
                            source,
                        })
                    }
                }
            })
        })
    }
}
