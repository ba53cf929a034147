// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Undo execution.
//!
//! Undo is a one-way server operation. A batch is issued all at once and
//! waited on as a whole: there is no short-circuit on the first failure, no
//! rollback of the entries that succeeded and no retry. Callers refetch
//! afterwards to see the outcome.

use crate::client::BackofficeApi;
use crate::error::ApiError;
use backoffice_domain::AuthenticatedActor;
use backoffice_undo::{StockCountSession, UndoAuthorizer, undoable_in_session};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// The result of one undo request within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoOutcome {
    /// The audit log entry the request targeted.
    pub log_id: i64,
    /// What the server said.
    pub result: Result<(), ApiError>,
}

/// Summary of a batch undo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchUndoReport {
    /// Entries the server reversed.
    pub succeeded: Vec<i64>,
    /// Entries the server refused, with the reason.
    pub failed: Vec<(i64, ApiError)>,
}

impl BatchUndoReport {
    /// Builds a report from individual outcomes, preserving their order.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<UndoOutcome>) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            match outcome.result {
                Ok(()) => report.succeeded.push(outcome.log_id),
                Err(err) => report.failed.push((outcome.log_id, err)),
            }
        }
        report
    }

    /// Number of undo requests issued.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Returns whether every request succeeded.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// The message of the first failure, for a single alert.
    #[must_use]
    pub fn first_error_message(&self) -> Option<String> {
        self.failed.first().map(|(_, err)| err.user_message())
    }
}

/// Issues undo requests.
#[derive(Clone)]
pub struct UndoExecutor {
    api: Arc<dyn BackofficeApi>,
}

impl UndoExecutor {
    /// Creates an executor over the given API.
    #[must_use]
    pub fn new(api: Arc<dyn BackofficeApi>) -> Self {
        Self { api }
    }

    /// Reverses one audit log entry.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection (its `error` message is kept) or the
    /// transport error.
    pub async fn undo(&self, log_id: i64) -> Result<(), ApiError> {
        match self.api.undo_audit_log(log_id).await {
            Ok(()) => {
                info!(log_id, "Undo succeeded");
                Ok(())
            }
            Err(err) => {
                warn!(log_id, error = %err, "Undo failed");
                Err(err)
            }
        }
    }

    /// Reverses several entries concurrently and waits for all of them.
    ///
    /// Outcomes are returned in the order of `log_ids`.
    pub async fn undo_group(&self, log_ids: &[i64]) -> Vec<UndoOutcome> {
        let requests = log_ids.iter().map(|&log_id| async move {
            UndoOutcome {
                log_id,
                result: self.undo(log_id).await,
            }
        });
        join_all(requests).await
    }

    /// Undoes every entry of a count session the actor is allowed to undo.
    ///
    /// Entries that are already undone or that the actor may not touch are
    /// skipped without a request.
    pub async fn handle_undo_group(
        &self,
        session: &StockCountSession,
        actor: &AuthenticatedActor,
        authorizer: &UndoAuthorizer,
    ) -> BatchUndoReport {
        let log_ids = undoable_in_session(session, actor, authorizer);
        info!(
            session = %session.id,
            entries = session.len(),
            undoable = log_ids.len(),
            "Undoing count session"
        );

        let report = BatchUndoReport::from_outcomes(self.undo_group(&log_ids).await);
        if !report.is_complete_success() {
            warn!(
                session = %session.id,
                succeeded = report.succeeded.len(),
                failed = report.failed.len(),
                "Count session only partially undone"
            );
        }
        report
    }
}
