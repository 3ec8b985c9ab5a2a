// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Startup session validation.
//!
//! The check runs once, when the host signals it has finished launching.
//! Sessions are renewed out of band by re-running the login tool, so an
//! expiring session is never re-checked on reads.

use crate::clock::Timestamp;
use crate::config::{AccountConfig, PlatformConfig};
use crate::error::Error;

/// Hint appended to fatal startup messages.
pub const LOGIN_HINT: &str = "Run \"motiv-cli login <email>\" to configure or renew the account";

/// Validates the account section before any accessory is created.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionGuard;

impl SessionGuard {
    /// Returns the account section if it exists and its session is still valid at `now`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingConfig`] if there is no account section.
    /// - [`Error::SessionExpired`] if a session expiry is recorded and is not
    ///   strictly after `now`.
    ///
    /// An account without a (readable) expiry passes; the account API will
    /// reject a dead session on the first read.
    pub fn check(config: &PlatformConfig, now: Timestamp) -> Result<&AccountConfig, Error> {
        let account = config.account.as_ref().ok_or(Error::MissingConfig)?;

        match account.session_expiry {
            Some(expired_at) if expired_at <= now => Err(Error::SessionExpired { expired_at }),
            _ => Ok(account),
        }
    }
}
