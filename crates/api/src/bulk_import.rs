// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cancellable B2B product bulk import.
//!
//! The import is a single long request: the server walks a range of B2B
//! product numbers and answers once, after all of them. The request carries
//! no timeout. The operator can cancel it at any time, which drops the
//! in-flight request.
//!
//! ## Lifecycle
//!
//! ```text
//! idle -> running -> succeeded | cancelled | timed_out | failed -> idle (reset)
//! ```
//!
//! Each terminal state has its own operator message. A timeout is never
//! reported as a plain failure because the server may still be importing.

use crate::client::BackofficeApi;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Product number prefixes the B2B catalogue uses.
pub const B2B_PREFIXES: [&str; 2] = ["TM", "CD"];

/// Highest product number the server accepts.
pub const MAX_PRODUCT_NUMBER: i64 = 9999;

/// Longest pause between upstream requests the server accepts.
pub const MAX_DELAY_MS: i64 = 10_000;

/// Pause the server uses when a negative delay is requested.
pub const DEFAULT_DELAY_MS: i64 = 500;

const OPERATION_NAME: &str = "Bulk import";

/// Parameters of one bulk import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkImportParams {
    /// Product number prefix, `TM` or `CD`.
    pub prefix: String,
    /// First product number.
    pub start: i64,
    /// Last product number, inclusive.
    pub end: i64,
    /// Pause between upstream requests in milliseconds.
    pub delay_ms: i64,
}

impl BulkImportParams {
    /// Creates parameters with the default delay.
    #[must_use]
    pub fn new(prefix: &str, start: i64, end: i64) -> Self {
        Self {
            prefix: prefix.to_string(),
            start,
            end,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }

    /// Sets the delay between upstream requests.
    #[must_use]
    pub const fn with_delay_ms(mut self, delay_ms: i64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Validates the parameters the way the server does.
    ///
    /// A negative delay is replaced with [`DEFAULT_DELAY_MS`].
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if:
    /// - `prefix` is not `TM` or `CD`
    /// - `start` or `end` is negative
    /// - `start` is greater than `end`
    /// - `end` exceeds [`MAX_PRODUCT_NUMBER`]
    /// - `delay_ms` exceeds [`MAX_DELAY_MS`]
    pub fn validate(mut self) -> Result<Self, ApiError> {
        let invalid = |field: &str, message: String| ApiError::InvalidInput {
            field: field.to_string(),
            message,
        };

        if !B2B_PREFIXES.contains(&self.prefix.as_str()) {
            return Err(invalid(
                "prefix",
                format!("prefix must be TM or CD, got '{}'", self.prefix),
            ));
        }
        if self.start < 0 || self.end < 0 {
            return Err(invalid(
                "start",
                String::from("start and end must be zero or positive"),
            ));
        }
        if self.start > self.end {
            return Err(invalid(
                "start",
                format!("start {} is greater than end {}", self.start, self.end),
            ));
        }
        if self.end > MAX_PRODUCT_NUMBER {
            return Err(invalid(
                "end",
                format!("end must be at most {MAX_PRODUCT_NUMBER}"),
            ));
        }
        if self.delay_ms < 0 {
            self.delay_ms = DEFAULT_DELAY_MS;
        }
        if self.delay_ms > MAX_DELAY_MS {
            return Err(invalid(
                "delay_ms",
                format!("delay must be at most {MAX_DELAY_MS} ms"),
            ));
        }

        Ok(self)
    }
}

/// The server's answer to a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkImportResponse {
    /// Products imported.
    #[serde(default)]
    pub imported: u64,
    /// Products skipped (already present or not found upstream).
    #[serde(default)]
    pub skipped: u64,
    /// Per-product error messages. The server sends `null` when there are
    /// none.
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    /// Set when the server stopped the import early on request.
    #[serde(default)]
    pub cancelled: bool,
}

/// Where a long-running operation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// Not started.
    Idle,
    /// Request in flight.
    Running,
    /// The server finished the import.
    Succeeded,
    /// The operator cancelled the import.
    Cancelled,
    /// The request timed out. The server may still be working.
    TimedOut,
    /// The request failed.
    Failed,
}

impl OperationStatus {
    /// Returns whether this is a final state of a run.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Cancelled | Self::TimedOut | Self::Failed
        )
    }

    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Cancelled => "cancelled",
            Self::TimedOut => "timed_out",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable state of the bulk import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancellableOperationState {
    /// Lifecycle position.
    pub status: OperationStatus,
    /// Products imported, from the server response.
    pub imported: u64,
    /// Products skipped, from the server response.
    pub skipped: u64,
    /// Per-product errors, from the server response.
    pub errors: Vec<String>,
    /// Operator-facing message for the current status.
    pub message: Option<String>,
}

impl Default for CancellableOperationState {
    fn default() -> Self {
        Self::idle()
    }
}

impl CancellableOperationState {
    /// The state before any run.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            status: OperationStatus::Idle,
            imported: 0,
            skipped: 0,
            errors: Vec::new(),
            message: None,
        }
    }

    fn running() -> Self {
        Self {
            status: OperationStatus::Running,
            ..Self::idle()
        }
    }

    fn terminal(status: OperationStatus, message: String) -> Self {
        Self {
            status,
            message: Some(message),
            ..Self::idle()
        }
    }

    fn with_counters(mut self, response: BulkImportResponse) -> Self {
        self.imported = response.imported;
        self.skipped = response.skipped;
        self.errors = response.errors.unwrap_or_default();
        self
    }
}

/// Maps the end of a request to a terminal state.
///
/// - a cancellation error, or a response flagged `cancelled`, is `Cancelled`
/// - a timeout error is `TimedOut`
/// - any other error is `Failed`
/// - any other response is `Succeeded`
///
/// Counters are copied from the response whenever one arrived.
#[must_use]
pub fn classify_outcome(result: Result<BulkImportResponse, ApiError>) -> CancellableOperationState {
    match result {
        Ok(response) if response.cancelled => CancellableOperationState::terminal(
            OperationStatus::Cancelled,
            format!(
                "Import was cancelled. {} products were imported before it stopped.",
                response.imported
            ),
        )
        .with_counters(response),
        Ok(response) => CancellableOperationState::terminal(
            OperationStatus::Succeeded,
            format!(
                "Import finished: {} imported, {} skipped, {} errors.",
                response.imported,
                response.skipped,
                response.errors.as_ref().map_or(0, Vec::len)
            ),
        )
        .with_counters(response),
        Err(err) if err.is_cancelled() => CancellableOperationState::terminal(
            OperationStatus::Cancelled,
            String::from("Import was cancelled."),
        ),
        Err(err) if err.is_timeout() => CancellableOperationState::terminal(
            OperationStatus::TimedOut,
            String::from(
                "The import request timed out. The import may still be running on the server; check the product list before starting it again.",
            ),
        ),
        Err(err) => CancellableOperationState::terminal(
            OperationStatus::Failed,
            format!("Import failed: {}", err.user_message()),
        ),
    }
}

/// Cancels an in-flight bulk import.
///
/// Cheap to clone; can be moved into a signal handler.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Owns the bulk import state machine.
///
/// Only one run at a time: `start` is refused while a run is in flight.
#[derive(Clone)]
pub struct BulkImportController {
    api: Arc<dyn BackofficeApi>,
    state: Arc<Mutex<CancellableOperationState>>,
}

impl BulkImportController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(api: Arc<dyn BackofficeApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(CancellableOperationState::idle())),
        }
    }

    /// A snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> CancellableOperationState {
        lock(&self.state).clone()
    }

    /// Starts a run.
    ///
    /// Parameters are validated first; a validation failure leaves the
    /// state untouched. No request is sent until [`BulkImportRun::wait`] is
    /// polled, so a run cancelled before then never reaches the server.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for bad parameters, or
    /// `ApiError::OperationInProgress` if a run is already in flight.
    pub fn start(&self, params: BulkImportParams) -> Result<BulkImportRun, ApiError> {
        let params = params.validate()?;

        let mut state = lock(&self.state);
        if state.status == OperationStatus::Running {
            return Err(ApiError::OperationInProgress {
                operation: String::from(OPERATION_NAME),
            });
        }
        *state = CancellableOperationState::running();
        drop(state);

        info!(
            prefix = %params.prefix,
            start = params.start,
            end = params.end,
            delay_ms = params.delay_ms,
            "Bulk import started"
        );

        Ok(BulkImportRun {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            params,
            token: CancellationToken::new(),
        })
    }

    /// Returns a finished controller to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::OperationInProgress` while a run is in flight.
    pub fn reset(&self) -> Result<(), ApiError> {
        let mut state = lock(&self.state);
        if state.status == OperationStatus::Running {
            return Err(ApiError::OperationInProgress {
                operation: String::from(OPERATION_NAME),
            });
        }
        *state = CancellableOperationState::idle();
        Ok(())
    }
}

/// One bulk import in flight.
///
/// Dropping a run before it finishes, including dropping the future
/// returned by [`BulkImportRun::wait`], records it as `Cancelled` so the
/// controller can be reset.
pub struct BulkImportRun {
    api: Arc<dyn BackofficeApi>,
    state: Arc<Mutex<CancellableOperationState>>,
    params: BulkImportParams,
    token: CancellationToken,
}

impl BulkImportRun {
    /// A handle that cancels this run.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            token: self.token.clone(),
        }
    }

    /// Requests cancellation of this run.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The validated parameters being imported.
    #[must_use]
    pub const fn params(&self) -> &BulkImportParams {
        &self.params
    }

    /// Drives the request to completion or cancellation and records the
    /// terminal state.
    pub async fn wait(self) -> CancellableOperationState {
        let result = tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ApiError::Cancelled),
            result = self.api.bulk_import_b2b(&self.params) => result,
        };

        let finished = classify_outcome(result);
        match finished.status {
            OperationStatus::Succeeded => info!(
                imported = finished.imported,
                skipped = finished.skipped,
                errors = finished.errors.len(),
                "Bulk import finished"
            ),
            status => warn!(%status, message = ?finished.message, "Bulk import did not finish"),
        }

        *lock(&self.state) = finished.clone();
        finished
    }
}

impl Drop for BulkImportRun {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        if state.status == OperationStatus::Running {
            warn!(prefix = %self.params.prefix, "Bulk import abandoned before it finished");
            *state = CancellableOperationState::terminal(
                OperationStatus::Cancelled,
                String::from(
                    "Import was abandoned before the server answered. It may still be running on the server.",
                ),
            );
        }
    }
}

fn lock(state: &Mutex<CancellableOperationState>) -> MutexGuard<'_, CancellableOperationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
