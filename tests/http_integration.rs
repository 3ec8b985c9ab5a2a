// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP account client using wiremock.

#![cfg(feature = "http")]

use chrono::{TimeZone, Utc};
use motiv_bridge::account::{AccountApiConfig, AccountClient, HttpAccountClientBuilder};
use motiv_bridge::config::AccountConfig;
use motiv_bridge::error::{FailureKind, ParseError, ProtocolError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LATEST_SLEEP: &str = "/v1/users/u1/sleep/latest";

fn client_for(server: &MockServer) -> motiv_bridge::HttpAccountClient {
    HttpAccountClientBuilder::new()
        .base_url(server.uri())
        .user_id("u1")
        .access_token("tok")
        .build()
        .unwrap()
}

// ============================================================================
// Successful reads
// ============================================================================

mod last_awakening {
    use super::*;

    #[tokio::test]
    async fn parses_iso_wake_time() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(LATEST_SLEEP))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "wakeTime": "2026-03-01T06:45:00Z",
                "sleepScore": 81
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let wake = client_for(&mock_server).last_awakening().await.unwrap();
        assert_eq!(
            wake.as_datetime(),
            Utc.with_ymd_and_hms(2026, 3, 1, 6, 45, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn parses_epoch_millis_wake_time() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(LATEST_SLEEP))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "wakeTime": 1_772_347_500_000_i64
            })))
            .mount(&mock_server)
            .await;

        let wake = client_for(&mock_server).last_awakening().await.unwrap();
        assert_eq!(wake.as_datetime().timestamp(), 1_772_347_500);
    }

    #[tokio::test]
    async fn every_call_is_a_fresh_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(LATEST_SLEEP))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "wakeTime": "2026-03-01T06:45:00Z"
            })))
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        for _ in 0..3 {
            client.last_awakening().await.unwrap();
        }
    }

    #[tokio::test]
    async fn user_id_is_url_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/users/a%2Fb/sleep/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "wakeTime": "2026-03-01T06:45:00Z"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpAccountClientBuilder::new()
            .base_url(mock_server.uri())
            .user_id("a/b")
            .access_token("tok")
            .build()
            .unwrap();

        assert!(client.last_awakening().await.is_ok());
    }

    #[tokio::test]
    async fn client_from_account_config() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(LATEST_SLEEP))
            .and(header("Authorization", "Bearer from-config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "wakeTime": "2026-03-01T06:45:00+01:00"
            })))
            .mount(&mock_server)
            .await;

        let account = AccountConfig::new("u1").with_access_token("from-config");
        let client = AccountApiConfig::new(mock_server.uri())
            .into_client(&account)
            .unwrap();

        assert!(!client.needs_auth());
        let wake = client.last_awakening().await.unwrap();
        assert_eq!(
            wake.as_datetime(),
            Utc.with_ymd_and_hms(2026, 3, 1, 5, 45, 0).unwrap()
        );
    }
}

// ============================================================================
// Failures
// ============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn unauthorized_is_auth_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).last_awakening().await.unwrap_err();
        assert!(matches!(err, ProtocolError::AuthenticationFailed));
        assert_eq!(err.kind(), FailureKind::Auth);
    }

    #[tokio::test]
    async fn forbidden_is_auth_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).last_awakening().await.unwrap_err();
        assert!(matches!(err, ProtocolError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn server_error_is_network_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).last_awakening().await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Network);
        match err {
            ProtocolError::ConnectionFailed(message) => {
                assert_eq!(message, "HTTP 500 - Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_wake_time_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sleepScore": 81
            })))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).last_awakening().await.unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Parse(ParseError::MissingField(ref field)) if field == "wakeTime"
        ));
    }

    #[tokio::test]
    async fn non_json_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).last_awakening().await.unwrap_err();
        assert!(matches!(err, ProtocolError::Parse(ParseError::Json(_))));
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        let client = HttpAccountClientBuilder::new()
            .base_url("http://127.0.0.1:1")
            .user_id("u1")
            .access_token("tok")
            .build()
            .unwrap();

        let err = client.last_awakening().await.unwrap_err();
        assert!(matches!(err, ProtocolError::Http(_)));
        assert_eq!(err.kind(), FailureKind::Network);
    }
}
