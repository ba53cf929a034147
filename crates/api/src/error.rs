// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use backoffice_domain::DomainError;
use backoffice_undo::CoreError;
use thiserror::Error;

/// API-level errors.
///
/// Timeouts and cancellations have their own variants because the bulk
/// import reports them as distinct outcomes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be sent or the connection failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The request did not complete within its timeout.
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// The request was cancelled by the caller.
    #[error("Request was cancelled")]
    Cancelled,

    /// The server answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// Invalid input was provided before any request was made.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// The client configuration is unusable.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A long-running operation is already in progress.
    #[error("{operation} is already running")]
    OperationInProgress { operation: String },
}

impl ApiError {
    /// Returns true if this error is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true if this error is a caller cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The message to show an operator.
    ///
    /// Server rejections carry the server's own message verbatim; everything
    /// else uses the error's display form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Server {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTimezone(tz) => Self::InvalidConfig {
                message: format!("unknown timezone '{tz}'"),
            },
            other => Self::Decode {
                message: other.to_string(),
            },
        }
    }
}
