// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Motiv bridge.
//!
//! Startup faults ([`Error::MissingConfig`], [`Error::SessionExpired`],
//! [`Error::AuthNotReady`]) halt the platform before any accessory exists.
//! Read faults ([`Error::Read`]) only affect the read that raised them.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::host::HostError;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The platform configuration has no `account` section.
    #[error("missing account credentials in platform configuration")]
    MissingConfig,

    /// The recorded session expiry is not after the launch instant.
    #[error("account session expired at {expired_at}")]
    SessionExpired {
        /// The recorded session expiry.
        expired_at: DateTime<Utc>,
    },

    /// The account client has no usable credentials loaded.
    #[error("account API needs authentication")]
    AuthNotReady,

    /// Reading a sensor's state from the account API failed.
    #[error("failed to read {sensor} sensor: {source}")]
    Read {
        /// The sensor type being read.
        sensor: String,
        /// The underlying API failure.
        #[source]
        source: ProtocolError,
    },

    /// The accessory was read before a read handler was attached.
    #[error("accessory {accessory:?} has no read handler")]
    HandlerMissing {
        /// Display name of the accessory.
        accessory: String,
    },

    /// A sensor type that cannot name an accessory.
    #[error("invalid sensor type: {0:?}")]
    InvalidSensorType(String),

    /// The host rejected a registration request.
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// The configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The account API could not be reached or set up.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Error {
    /// Returns true for errors that halt the platform at startup.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingConfig | Self::SessionExpired { .. } | Self::AuthNotReady
        )
    }
}

/// Broad classification of an account API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The API could not be reached or answered unexpectedly.
    Network,
    /// The API rejected the session credentials.
    Auth,
}

/// Errors related to talking to the account API.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an unexpected status.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The response body could not be understood.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl ProtocolError {
    /// Classifies this error as a network or an auth failure.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::AuthenticationFailed => FailureKind::Auth,
            _ => FailureKind::Network,
        }
    }
}

/// Errors related to parsing account API responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to loading the platform configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON or has the wrong shape.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
