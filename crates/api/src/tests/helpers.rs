// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApiError, BackofficeApi, BulkImportParams, BulkImportResponse};
use async_trait::async_trait;
use backoffice_audit::{AuditAction, AuditLogEntry, AuditLogQuery};
use backoffice_domain::{
    AuthenticatedActor, DomainRecord, EntityType, Role, parse_server_timestamp, parse_timestamp,
};
use std::collections::HashMap;
use std::sync::Mutex;
use time::macros::date;

/// How the mock answers a bulk import.
pub enum BulkBehaviour {
    Respond(Result<BulkImportResponse, ApiError>),
    Hang,
}

/// In-memory [`BackofficeApi`] that records every call.
pub struct MockApi {
    pub records: Vec<DomainRecord>,
    pub logs: Vec<AuditLogEntry>,
    pub records_error: Option<ApiError>,
    pub audit_error: Option<ApiError>,
    pub undo_failures: HashMap<i64, ApiError>,
    pub bulk: BulkBehaviour,
    pub undo_calls: Mutex<Vec<i64>>,
    pub audit_queries: Mutex<Vec<AuditLogQuery>>,
    pub bulk_calls: Mutex<Vec<BulkImportParams>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            logs: Vec::new(),
            records_error: None,
            audit_error: None,
            undo_failures: HashMap::new(),
            bulk: BulkBehaviour::Respond(Ok(BulkImportResponse::default())),
            undo_calls: Mutex::new(Vec::new()),
            audit_queries: Mutex::new(Vec::new()),
            bulk_calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockApi {
    pub fn undo_calls(&self) -> Vec<i64> {
        self.undo_calls.lock().unwrap().clone()
    }

    pub fn audit_queries(&self) -> Vec<AuditLogQuery> {
        self.audit_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackofficeApi for MockApi {
    async fn list_records(
        &self,
        entity_type: &EntityType,
        branch_id: Option<i64>,
    ) -> Result<Vec<DomainRecord>, ApiError> {
        if let Some(err) = &self.records_error {
            return Err(err.clone());
        }
        Ok(self
            .records
            .iter()
            .filter(|record| record.entity_type() == entity_type)
            .filter(|record| branch_id.is_none_or(|branch_id| record.branch_id() == branch_id))
            .cloned()
            .collect())
    }

    async fn list_audit_logs(
        &self,
        query: &AuditLogQuery,
    ) -> Result<Vec<AuditLogEntry>, ApiError> {
        self.audit_queries.lock().unwrap().push(query.clone());
        if let Some(err) = &self.audit_error {
            return Err(err.clone());
        }
        Ok(self
            .logs
            .iter()
            .filter(|log| {
                query
                    .entity_type
                    .as_ref()
                    .is_none_or(|entity_type| &log.entity_type == entity_type)
            })
            .filter(|log| query.user_id.is_none_or(|user_id| log.user_id == user_id))
            .cloned()
            .collect())
    }

    async fn undo_audit_log(&self, log_id: i64) -> Result<(), ApiError> {
        self.undo_calls.lock().unwrap().push(log_id);
        tokio::task::yield_now().await;
        match self.undo_failures.get(&log_id) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn bulk_import_b2b(
        &self,
        params: &BulkImportParams,
    ) -> Result<BulkImportResponse, ApiError> {
        self.bulk_calls.lock().unwrap().push(params.clone());
        match &self.bulk {
            BulkBehaviour::Respond(result) => result.clone(),
            BulkBehaviour::Hang => {
                std::future::pending::<Result<BulkImportResponse, ApiError>>().await
            }
        }
    }
}

pub fn create_test_super_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(1, Role::SuperAdmin, None)
}

pub fn create_test_branch_admin(user_id: i64, branch_id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(user_id, Role::BranchAdmin, Some(branch_id))
}

pub fn create_test_stock_record(id: i64, created_at: &str) -> DomainRecord {
    DomainRecord::new(EntityType::StockEntry, id, 1)
        .with_date(date!(2024 - 01 - 10))
        .with_created_at(parse_server_timestamp(created_at).unwrap())
}

pub fn create_test_create_log(id: i64, entity_type: EntityType, entity_id: i64) -> AuditLogEntry {
    AuditLogEntry::new(
        id,
        parse_timestamp("2024-01-10 09:00:00").unwrap(),
        Some(1),
        42,
        "Ayse",
        entity_type,
        entity_id,
        AuditAction::Create,
    )
}

pub fn server_error(status: u16, message: &str) -> ApiError {
    ApiError::Server {
        status,
        message: message.to_string(),
    }
}
