// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! API boundary for the restaurant back office.
//!
//! Wraps the back-office REST API behind the [`BackofficeApi`] trait and
//! builds the undo workflows on top of it:
//!
//! - [`AuditLogClient`] reads audit log slices
//! - [`RecordLoader`] loads domain records annotated with provenance
//! - [`UndoExecutor`] reverses single entries and whole count sessions
//! - [`BulkImportController`] drives the cancellable B2B product import

mod audit_client;
mod bulk_import;
mod client;
mod config;
mod error;
mod loader;
mod undo;

#[cfg(test)]
mod tests;

pub use audit_client::{AuditLogClient, AuditScope};
pub use bulk_import::{
    BulkImportController, BulkImportParams, BulkImportResponse, BulkImportRun, CancelHandle,
    CancellableOperationState, DEFAULT_DELAY_MS, MAX_DELAY_MS, MAX_PRODUCT_NUMBER,
    OperationStatus, classify_outcome,
};
pub use client::{BackofficeApi, HttpClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use error::ApiError;
pub use loader::RecordLoader;
pub use undo::{BatchUndoReport, UndoExecutor, UndoOutcome};
