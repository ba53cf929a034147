// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApiError, ClientConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT, HttpClient};
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = ClientConfig::default();

    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.token, None);
    assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}

#[test]
fn test_validate_trims_trailing_slashes() {
    let config = ClientConfig::new("  https://backoffice.example.com/api//  ")
        .validate()
        .unwrap();

    assert_eq!(config.base_url, "https://backoffice.example.com/api");
}

#[test]
fn test_validate_drops_blank_token() {
    let config = ClientConfig::default()
        .with_token(Some(String::from("   ")))
        .validate()
        .unwrap();
    assert_eq!(config.token, None);

    let config = ClientConfig::default()
        .with_token(Some(String::from("abc")))
        .validate()
        .unwrap();
    assert_eq!(config.token.as_deref(), Some("abc"));
}

#[test]
fn test_validate_rejects_bad_urls() {
    assert!(matches!(
        ClientConfig::new("   ").validate(),
        Err(ApiError::InvalidConfig { .. })
    ));
    assert!(matches!(
        ClientConfig::new("ftp://files.example.com").validate(),
        Err(ApiError::InvalidConfig { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_timeout() {
    assert!(matches!(
        ClientConfig::default()
            .with_request_timeout(Duration::ZERO)
            .validate(),
        Err(ApiError::InvalidConfig { .. })
    ));
}

#[test]
fn test_http_client_uses_normalized_url() {
    let client = HttpClient::new(ClientConfig::new("http://127.0.0.1:9/api/")).unwrap();
    assert_eq!(client.base_url(), "http://127.0.0.1:9/api");
}

#[test]
fn test_error_classification_helpers() {
    assert!(ApiError::Cancelled.is_cancelled());
    assert!(!ApiError::Cancelled.is_timeout());
    let timeout = ApiError::Timeout {
        message: String::from("elapsed"),
    };
    assert!(timeout.is_timeout());
    assert_eq!(
        ApiError::Server {
            status: 403,
            message: String::from("Yetkisiz"),
        }
        .user_message(),
        "Yetkisiz"
    );
}
