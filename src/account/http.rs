// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP implementation of the account client.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::account::{AccountClient, AccountClientFactory, WakeTime};
use crate::config::AccountConfig;
use crate::error::ProtocolError;

// ============================================================================
// AccountApiConfig - Connection parameters for the account API
// ============================================================================

/// Connection parameters for the Motiv account API.
///
/// # Examples
///
/// ```
/// use motiv_bridge::account::AccountApiConfig;
/// use std::time::Duration;
///
/// let api = AccountApiConfig::new("https://api.example.com/")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(api.base_url(), "https://api.example.com");
/// ```
#[derive(Debug, Clone)]
pub struct AccountApiConfig {
    base_url: String,
    timeout: Duration,
}

impl AccountApiConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the API rooted at `base_url`.
    ///
    /// A bare host name gets an `https://` scheme. Trailing slashes are dropped.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an [`HttpAccountClient`] for `account`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self, account: &AccountConfig) -> Result<HttpAccountClient, ProtocolError> {
        let mut builder = HttpAccountClientBuilder::new()
            .base_url(self.base_url)
            .user_id(&account.user_id)
            .timeout(self.timeout);

        if let Some(token) = account.access_token() {
            builder = builder.access_token(token);
        }

        builder.build()
    }
}

impl AccountClientFactory for AccountApiConfig {
    type Client = HttpAccountClient;

    fn create(&self, account: &AccountConfig) -> Result<HttpAccountClient, ProtocolError> {
        self.clone().into_client(account)
    }
}

fn normalize_base_url(base_url: String) -> String {
    let base_url = if base_url.starts_with("http://") || base_url.starts_with("https://") {
        base_url
    } else {
        format!("https://{base_url}")
    };
    base_url.trim_end_matches('/').to_string()
}

// ============================================================================
// HttpAccountClient
// ============================================================================

/// Account client talking to the Motiv API over HTTP.
///
/// Fetches `GET {base}/v1/users/{userId}/sleep/latest` with a bearer token
/// and reads the `wakeTime` field of the response.
///
/// # Examples
///
/// ```no_run
/// use motiv_bridge::account::{AccountClient, HttpAccountClientBuilder};
///
/// # async fn example() -> Result<(), motiv_bridge::ProtocolError> {
/// let client = HttpAccountClientBuilder::new()
///     .base_url("https://api.example.com")
///     .user_id("u1")
///     .access_token("token")
///     .build()?;
/// let wake = client.last_awakening().await?;
/// println!("last woke at {wake}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpAccountClient {
    base_url: String,
    user_id: String,
    access_token: Option<String>,
    client: Client,
}

impl HttpAccountClient {
    /// Returns the base URL of the API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the account user id.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Builds the URL of the latest-sleep endpoint.
    fn latest_sleep_url(&self) -> String {
        format!(
            "{}/v1/users/{}/sleep/latest",
            self.base_url,
            urlencoding::encode(&self.user_id)
        )
    }
}

impl AccountClient for HttpAccountClient {
    fn needs_auth(&self) -> bool {
        self.access_token.is_none()
    }

    async fn last_awakening(&self) -> Result<WakeTime, ProtocolError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(ProtocolError::AuthenticationFailed)?;
        let url = self.latest_sleep_url();

        tracing::debug!(url = %url, "Fetching latest sleep record");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProtocolError::AuthenticationFailed);
        }

        if !status.is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "Received sleep record");

        Ok(WakeTime::from_response_body(&body)?)
    }
}

/// Builder for creating an [`HttpAccountClient`].
#[derive(Debug, Default)]
pub struct HttpAccountClientBuilder {
    base_url: Option<String>,
    user_id: Option<String>,
    access_token: Option<String>,
    timeout: Option<Duration>,
}

impl HttpAccountClientBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the account user id.
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the bearer token.
    ///
    /// Blank tokens are ignored, leaving the client in the needs-auth state.
    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.access_token = (!token.trim().is_empty()).then_some(token);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL or user id is missing, or if the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<HttpAccountClient, ProtocolError> {
        let base_url = self
            .base_url
            .filter(|u| !u.trim().is_empty())
            .map(normalize_base_url)
            .ok_or_else(|| ProtocolError::InvalidAddress("base URL is required".to_string()))?;

        let user_id = self
            .user_id
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ProtocolError::InvalidAddress("user id is required".to_string()))?;

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(AccountApiConfig::DEFAULT_TIMEOUT))
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpAccountClient {
            base_url,
            user_id,
            access_token: self.access_token,
            client,
        })
    }
}
