// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Account API access.
//!
//! The platform only needs two things from the Motiv account API: whether
//! usable credentials are loaded, and the instant of the most recent wake
//! event. [`AccountClient`] is that seam. [`HttpAccountClient`] is the
//! default implementation over HTTPS.
//!
//! Clients never retry and never cache: each call to
//! [`last_awakening`](AccountClient::last_awakening) is one fresh remote fetch.

#[cfg(feature = "http")]
mod http;
mod wake_time;

use std::future::Future;

#[cfg(feature = "http")]
pub use http::{AccountApiConfig, HttpAccountClient, HttpAccountClientBuilder};
pub use wake_time::{WAKE_TIME_FIELD, WakeTime};

use crate::clock::Timestamp;
use crate::config::AccountConfig;
use crate::error::ProtocolError;

/// Client for the remote account API.
pub trait AccountClient: Send + Sync + 'static {
    /// Returns true while no usable credentials are loaded.
    fn needs_auth(&self) -> bool;

    /// Fetches the instant of the most recent wake event.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::AuthenticationFailed`] when the API rejects
    /// the session, or another [`ProtocolError`] when the call fails.
    fn last_awakening(&self) -> impl Future<Output = Result<WakeTime, ProtocolError>> + Send;
}

/// Builds an [`AccountClient`] from the account section of the configuration.
///
/// Implemented for any `Fn(&AccountConfig) -> Result<C, ProtocolError>`.
pub trait AccountClientFactory {
    /// The client type produced.
    type Client: AccountClient;

    /// Creates a client for `account`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if the client cannot be set up.
    fn create(&self, account: &AccountConfig) -> Result<Self::Client, ProtocolError>;
}

impl<F, C> AccountClientFactory for F
where
    F: Fn(&AccountConfig) -> Result<C, ProtocolError>,
    C: AccountClient,
{
    type Client = C;

    fn create(&self, account: &AccountConfig) -> Result<C, ProtocolError> {
        self(account)
    }
}

/// Returns true when a wake event at `last_wake` falls in the occupancy window at `now`.
///
/// The window is open when the wake instant is at or after `now`.
#[must_use]
pub fn is_occupied(last_wake: WakeTime, now: Timestamp) -> bool {
    last_wake.as_datetime() >= now
}
