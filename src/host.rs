// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary with the home-automation host.
//!
//! The host persists accessories across restarts, answers client queries by
//! invoking accessory read handlers, and signals readiness once its cache has
//! been replayed. This crate only calls back into it to register and
//! unregister accessories.

use thiserror::Error;
use uuid::Uuid;

use crate::accessory::Accessory;

/// Namespace for host-style UUIDs derived from a string key.
pub const UUID_NAMESPACE: Uuid = Uuid::NAMESPACE_OID;

/// Package and plugin names the host files accessories under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginIdentity {
    /// Package name, e.g. `homebridge-motiv`.
    pub package_name: String,
    /// Display name of the platform plugin, e.g. `Motiv`.
    pub plugin_name: String,
}

impl PluginIdentity {
    /// Creates an identity from explicit names.
    #[must_use]
    pub fn new(package_name: impl Into<String>, plugin_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            plugin_name: plugin_name.into(),
        }
    }
}

impl Default for PluginIdentity {
    fn default() -> Self {
        Self::new("homebridge-motiv", "Motiv")
    }
}

impl std::fmt::Display for PluginIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.package_name, self.plugin_name)
    }
}

/// The host rejected a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{operation} failed: {message}")]
pub struct HostError {
    /// The host operation that failed.
    pub operation: &'static str,
    /// Host-supplied description.
    pub message: String,
}

impl HostError {
    /// Creates a new host error.
    #[must_use]
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Operations the platform calls on the host.
pub trait HostApi: Send + Sync {
    /// Hands newly created accessories to the host.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the host refuses the accessories.
    fn register_platform_accessories(
        &self,
        plugin: &PluginIdentity,
        accessories: &[Accessory],
    ) -> Result<(), HostError>;

    /// Asks the host to forget accessories.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the host refuses the request.
    fn unregister_platform_accessories(
        &self,
        plugin: &PluginIdentity,
        accessories: &[Accessory],
    ) -> Result<(), HostError>;

    /// Derives a UUID from `key`.
    ///
    /// Must be a pure function of `key`. The default is a name-based
    /// (version 5) UUID in [`UUID_NAMESPACE`].
    fn generate_uuid(&self, key: &str) -> Uuid {
        Uuid::new_v5(&UUID_NAMESPACE, key.as_bytes())
    }
}

impl<H: HostApi + ?Sized> HostApi for std::sync::Arc<H> {
    fn register_platform_accessories(
        &self,
        plugin: &PluginIdentity,
        accessories: &[Accessory],
    ) -> Result<(), HostError> {
        (**self).register_platform_accessories(plugin, accessories)
    }

    fn unregister_platform_accessories(
        &self,
        plugin: &PluginIdentity,
        accessories: &[Accessory],
    ) -> Result<(), HostError> {
        (**self).unregister_platform_accessories(plugin, accessories)
    }

    fn generate_uuid(&self, key: &str) -> Uuid {
        (**self).generate_uuid(key)
    }
}
