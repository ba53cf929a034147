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
    clippy::all
)]

use backoffice_domain::{EntityType, serde_timestamp};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// The kind of mutation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A record was created.
    Create,
    /// A record was modified.
    Update,
    /// A record was deleted.
    Delete,
    /// A previous entry was reversed.
    Undo,
}

impl AuditAction {
    /// Converts this action to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Undo => "undo",
        }
    }

    /// Returns whether the server can reverse an entry with this action.
    ///
    /// Undo entries are themselves terminal and cannot be reversed.
    #[must_use]
    pub const fn is_reversible(&self) -> bool {
        !matches!(self, Self::Undo)
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable audit log entry as returned by `GET /audit-logs`.
///
/// The server writes exactly one `create` entry when a record is created and
/// owns the log entirely; the client only reads entries and asks for undos.
/// Apart from the undo fields (`is_undone`, `undone_by`, `undone_at`), an
/// entry never changes. The undo fields are set once by a successful undo
/// and never reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// The log entry id. This is the id undo requests target.
    pub id: i64,
    /// When the mutation happened.
    #[serde(with = "serde_timestamp")]
    pub created_at: OffsetDateTime,
    /// The branch the mutated record belongs to, if any.
    pub branch_id: Option<i64>,
    /// The operator who performed the mutation.
    pub user_id: i64,
    /// Display name of that operator, denormalized by the server.
    pub user_name: String,
    /// The kind of record mutated.
    pub entity_type: EntityType,
    /// The id of the mutated record within its entity type.
    pub entity_id: i64,
    /// What was done.
    pub action: AuditAction,
    /// Short human-readable summary.
    #[serde(default)]
    pub description: String,
    /// Whether this entry has been reversed.
    #[serde(default)]
    pub is_undone: bool,
    /// Who reversed it.
    #[serde(default)]
    pub undone_by: Option<i64>,
    /// When it was reversed.
    #[serde(default, with = "serde_timestamp::option")]
    pub undone_at: Option<OffsetDateTime>,
}

impl AuditLogEntry {
    /// Creates a new, not-yet-undone entry.
    ///
    /// Used by tests and fixtures; real entries come from the server.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        created_at: OffsetDateTime,
        branch_id: Option<i64>,
        user_id: i64,
        user_name: &str,
        entity_type: EntityType,
        entity_id: i64,
        action: AuditAction,
    ) -> Self {
        Self {
            id,
            created_at,
            branch_id,
            user_id,
            user_name: user_name.to_string(),
            entity_type,
            entity_id,
            action,
            description: String::new(),
            is_undone: false,
            undone_by: None,
            undone_at: None,
        }
    }

    /// Returns a copy of this entry marked as reversed.
    #[must_use]
    pub fn undone(mut self, undone_by: i64, undone_at: OffsetDateTime) -> Self {
        self.is_undone = true;
        self.undone_by = Some(undone_by);
        self.undone_at = Some(undone_at);
        self
    }

    /// Returns whether this is the creation entry of the given record.
    #[must_use]
    pub fn is_creation_of(&self, entity_type: &EntityType, entity_id: i64) -> bool {
        self.action == AuditAction::Create
            && self.entity_id == entity_id
            && &self.entity_type == entity_type
    }

    /// Returns whether the server would still accept an undo for this entry.
    #[must_use]
    pub const fn is_undoable(&self) -> bool {
        self.action.is_reversible() && !self.is_undone
    }
}

/// Filter for `GET /audit-logs`.
///
/// Unset fields are not sent. For branch admins the server ignores
/// `branch_id` and scopes to the operator's own branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Only entries for this entity type.
    pub entity_type: Option<EntityType>,
    /// Only entries for this branch.
    pub branch_id: Option<i64>,
    /// Only entries made by this operator.
    pub user_id: Option<i64>,
    /// Only entries for this record id.
    pub entity_id: Option<i64>,
}

impl AuditLogQuery {
    /// Creates a query for all entries of one entity type.
    #[must_use]
    pub const fn for_entity_type(entity_type: EntityType) -> Self {
        Self {
            entity_type: Some(entity_type),
            branch_id: None,
            user_id: None,
            entity_id: None,
        }
    }

    /// Restricts the query to a branch.
    #[must_use]
    pub const fn in_branch(mut self, branch_id: Option<i64>) -> Self {
        self.branch_id = branch_id;
        self
    }

    /// Restricts the query to one operator's entries.
    #[must_use]
    pub const fn by_user(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Restricts the query to a single record.
    #[must_use]
    pub const fn for_entity(mut self, entity_id: Option<i64>) -> Self {
        self.entity_id = entity_id;
        self
    }

    /// Renders the query string pairs, omitting unset filters.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = Vec::new();
        if let Some(entity_type) = &self.entity_type {
            pairs.push(("entity_type", entity_type.to_string()));
        }
        if let Some(branch_id) = self.branch_id {
            pairs.push(("branch_id", branch_id.to_string()));
        }
        if let Some(user_id) = self.user_id {
            pairs.push(("user_id", user_id.to_string()));
        }
        if let Some(entity_id) = self.entity_id {
            pairs.push(("entity_id", entity_id.to_string()));
        }
        pairs
    }
}
