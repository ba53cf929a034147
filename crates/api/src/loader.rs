// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::audit_client::{AuditLogClient, AuditScope};
use crate::client::BackofficeApi;
use crate::error::ApiError;
use backoffice_audit::AuditLogEntry;
use backoffice_domain::EntityType;
use backoffice_undo::{
    AnnotatedRecord, StockCountSession, StockSessionGrouper, correlate, filter_by_month,
};
use std::sync::Arc;
use time::{Date, Month};
use tracing::{info, warn};

/// Loads domain records together with their provenance.
#[derive(Clone)]
pub struct RecordLoader {
    api: Arc<dyn BackofficeApi>,
    audit: AuditLogClient,
    grouper: StockSessionGrouper,
}

impl RecordLoader {
    /// Creates a loader that groups stock sessions with `grouper`.
    #[must_use]
    pub fn new(api: Arc<dyn BackofficeApi>, grouper: StockSessionGrouper) -> Self {
        Self {
            audit: AuditLogClient::new(Arc::clone(&api)),
            api,
            grouper,
        }
    }

    /// Lists one collection annotated with creator and undo state.
    ///
    /// The records and the audit slice are fetched concurrently. When only
    /// the audit fetch fails, the records are still returned, without
    /// provenance, so nothing in them can be undone.
    ///
    /// # Errors
    ///
    /// Returns an error if the record collection cannot be fetched.
    pub async fn load_annotated(
        &self,
        entity_type: &EntityType,
        scope: AuditScope,
    ) -> Result<Vec<AnnotatedRecord>, ApiError> {
        let (records, logs) = tokio::join!(
            self.api.list_records(entity_type, scope.branch_id),
            self.audit.fetch(entity_type, scope)
        );
        let records = records?;
        let logs: Vec<AuditLogEntry> = logs.unwrap_or_else(|err| {
            warn!(
                entity_type = %entity_type,
                error = %err,
                "Failed to load audit logs, records will not be undoable"
            );
            Vec::new()
        });

        info!(
            entity_type = %entity_type,
            records = records.len(),
            logs = logs.len(),
            "Loaded records"
        );
        Ok(correlate(records, &logs))
    }

    /// Lists stock count sessions, optionally for one business date.
    ///
    /// # Errors
    ///
    /// Returns an error if the stock entries cannot be fetched or an entry
    /// lacks the fields grouping needs.
    pub async fn load_stock_sessions(
        &self,
        scope: AuditScope,
        date: Option<Date>,
    ) -> Result<Vec<StockCountSession>, ApiError> {
        let mut entries = self.load_annotated(&EntityType::StockEntry, scope).await?;
        if let Some(date) = date {
            entries.retain(|entry| entry.record.date() == Some(date));
        }
        Ok(self.grouper.group(entries)?)
    }

    /// Lists one operator's audit entries for a calendar month.
    ///
    /// # Errors
    ///
    /// Returns an error if the audit log cannot be fetched.
    pub async fn load_activity(
        &self,
        entity_type: Option<&EntityType>,
        scope: AuditScope,
        year: i32,
        month: Month,
    ) -> Result<Vec<AuditLogEntry>, ApiError> {
        let logs = match entity_type {
            Some(entity_type) => self.audit.fetch(entity_type, scope).await?,
            None => self.audit.fetch_all(scope).await?,
        };
        Ok(filter_by_month(&logs, year, month))
    }
}
