// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform configuration types.
//!
//! The host hands the platform its configuration block as JSON:
//!
//! ```json
//! {
//!   "platform": "Motiv",
//!   "name": "Motiv",
//!   "account": {
//!     "userId": "u1",
//!     "email": "me@example.com",
//!     "accessToken": "...",
//!     "sessionExpiry": "2030-01-01T00:00:00Z"
//!   }
//! }
//! ```
//!
//! Only `account` is interpreted. The account section is written by the
//! external login tool and is never mutated here.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::account::WakeTime;
use crate::error::ConfigError;

/// Configuration for a Motiv platform instance.
///
/// # Examples
///
/// ```
/// use motiv_bridge::config::{AccountConfig, PlatformConfig};
///
/// let config = PlatformConfig::from_json_str(
///     r#"{"platform": "Motiv", "account": {"userId": "u1", "accessToken": "t"}}"#,
/// )
/// .unwrap();
/// assert_eq!(config.account.unwrap().user_id, "u1");
///
/// // Programmatic construction
/// let config = PlatformConfig::new().with_account(AccountConfig::new("u1"));
/// assert!(config.account.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Platform identifier as written by the host. Not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Instance name as written by the host. Only used in log output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Account credentials and session material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountConfig>,
}

impl PlatformConfig {
    /// Creates an empty configuration (no account).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account section.
    #[must_use]
    pub fn with_account(mut self, account: AccountConfig) -> Self {
        self.account = Some(account);
        self
    }

    /// Sets the instance name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the input is not a valid platform block.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Converts an already-parsed JSON value into a configuration.
    ///
    /// A JSON `null` yields an empty configuration, mirroring hosts that
    /// pass no block at all.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the value has the wrong shape.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(Into::into)
    }

    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Json`] if it cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Returns the instance name, falling back to `"Motiv"`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Motiv")
    }
}

/// Account credentials and session material.
///
/// Fields other than the ones named here are kept in [`extra`](Self::extra)
/// and passed untouched to the account client factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfig {
    /// Motiv account user id. Part of every accessory identifier.
    pub user_id: String,
    /// Login email, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Bearer token for the account API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Token used by the login tool to renew the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Instant after which the session is no longer valid.
    ///
    /// Read from an ISO 8601 string or a Unix epoch. An unreadable value is
    /// logged and treated as absent.
    #[serde(
        default,
        deserialize_with = "lenient_expiry",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_expiry: Option<DateTime<Utc>>,
    /// Any further credential fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AccountConfig {
    /// Creates an account section for the given user with no credentials.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            access_token: None,
            refresh_token: None,
            session_expiry: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the login email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the session expiry.
    #[must_use]
    pub fn with_session_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.session_expiry = Some(expiry);
        self
    }

    /// Returns the access token if one is set and non-empty.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

fn lenient_expiry<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match WakeTime::from_json(&value) {
        Ok(expiry) => Some(expiry.as_datetime()),
        Err(_) => {
            tracing::warn!(value = %value, "Ignoring unreadable sessionExpiry");
            None
        }
    }))
}
