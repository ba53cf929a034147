// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ApiError;
use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Per-request timeout for ordinary calls.
///
/// The bulk import request is exempt.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the back-office API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, e.g. `https://backoffice.example.com/api`.
    pub base_url: String,
    /// Opaque bearer token sent with every request.
    pub token: Option<String>,
    /// Timeout applied to every request except the bulk import.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given API root.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Validates and normalizes the configuration.
    ///
    /// Trailing slashes are trimmed from `base_url` and a blank token is
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidConfig` if:
    /// - `base_url` is blank
    /// - `base_url` is not an `http` or `https` URL
    /// - `request_timeout` is zero
    pub fn validate(self) -> Result<Self, ApiError> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidConfig {
                message: String::from("base URL is empty"),
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidConfig {
                message: format!("base URL '{base_url}' must start with http:// or https://"),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ApiError::InvalidConfig {
                message: String::from("request timeout must be greater than zero"),
            });
        }

        Ok(Self {
            base_url,
            token: self.token.filter(|token| !token.trim().is_empty()),
            request_timeout: self.request_timeout,
        })
    }
}
