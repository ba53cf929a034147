// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::client::BackofficeApi;
use crate::error::ApiError;
use backoffice_audit::{AuditLogEntry, AuditLogQuery};
use backoffice_domain::EntityType;
use std::sync::Arc;
use tracing::debug;

/// Narrows an audit log fetch. Unset fields are not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditScope {
    /// Only entries for this branch.
    pub branch_id: Option<i64>,
    /// Only entries by this operator.
    pub user_id: Option<i64>,
    /// Only entries for this record id.
    pub entity_id: Option<i64>,
}

impl AuditScope {
    /// A scope covering one branch.
    #[must_use]
    pub const fn branch(branch_id: Option<i64>) -> Self {
        Self {
            branch_id,
            user_id: None,
            entity_id: None,
        }
    }

    /// Restricts the scope to one operator.
    #[must_use]
    pub const fn by_user(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Restricts the scope to one record.
    #[must_use]
    pub const fn for_entity(mut self, entity_id: Option<i64>) -> Self {
        self.entity_id = entity_id;
        self
    }
}

/// Reads slices of the audit log.
///
/// One request per call, no pagination.
#[derive(Clone)]
pub struct AuditLogClient {
    api: Arc<dyn BackofficeApi>,
}

impl AuditLogClient {
    /// Creates a client over the given API.
    #[must_use]
    pub fn new(api: Arc<dyn BackofficeApi>) -> Self {
        Self { api }
    }

    /// Fetches entries for one entity type within a scope.
    ///
    /// # Errors
    ///
    /// Returns the transport or server error unchanged.
    pub async fn fetch(
        &self,
        entity_type: &EntityType,
        scope: AuditScope,
    ) -> Result<Vec<AuditLogEntry>, ApiError> {
        let query = AuditLogQuery::for_entity_type(entity_type.clone());
        self.run(query, scope).await
    }

    /// Fetches entries of every entity type within a scope.
    ///
    /// # Errors
    ///
    /// Returns the transport or server error unchanged.
    pub async fn fetch_all(&self, scope: AuditScope) -> Result<Vec<AuditLogEntry>, ApiError> {
        self.run(AuditLogQuery::default(), scope).await
    }

    async fn run(
        &self,
        query: AuditLogQuery,
        scope: AuditScope,
    ) -> Result<Vec<AuditLogEntry>, ApiError> {
        let query = query
            .in_branch(scope.branch_id)
            .by_user(scope.user_id)
            .for_entity(scope.entity_id);
        let logs = self.api.list_audit_logs(&query).await?;
        debug!(
            entity_type = query.entity_type.as_ref().map(EntityType::as_str),
            count = logs.len(),
            "Fetched audit logs"
        );
        Ok(logs)
    }
}
