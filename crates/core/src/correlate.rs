// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use backoffice_audit::{AuditAction, AuditLogEntry};
use backoffice_domain::{DomainRecord, EntityType};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// A domain record enriched with the provenance of its creation.
///
/// Provenance comes from the record's `create` audit entry. A record with no
/// such entry is still listed; it just cannot be undone.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRecord {
    /// The underlying record.
    pub record: DomainRecord,
    /// The operator who created the record.
    pub created_by_user_id: Option<i64>,
    /// That operator's display name.
    pub created_by_user_name: Option<String>,
    /// Id of the record's `create` audit entry.
    pub log_id: Option<i64>,
    /// Whether that entry has been undone.
    pub is_undone: bool,
}

impl AnnotatedRecord {
    /// Wraps a record with no provenance.
    #[must_use]
    pub const fn unannotated(record: DomainRecord) -> Self {
        Self {
            record,
            created_by_user_id: None,
            created_by_user_name: None,
            log_id: None,
            is_undone: false,
        }
    }

    /// Attaches the provenance carried by a `create` entry.
    #[must_use]
    pub fn with_creation(mut self, log: &AuditLogEntry) -> Self {
        self.created_by_user_id = Some(log.user_id);
        self.created_by_user_name = Some(log.user_name.clone());
        self.log_id = Some(log.id);
        self.is_undone = log.is_undone;
        self
    }

    /// The record's entity type.
    #[must_use]
    pub const fn entity_type(&self) -> &EntityType {
        self.record.entity_type()
    }

    /// The record id.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.record.id()
    }

    /// The branch the record belongs to.
    #[must_use]
    pub const fn branch_id(&self) -> i64 {
        self.record.branch_id()
    }
}

/// Joins domain records with their `create` audit entries.
///
/// For each record, the first log in input order with the same entity type,
/// `entity_id == record.id` and action `create` supplies the provenance.
/// The output has one element per record, in record order.
///
/// # Arguments
///
/// * `records` - Domain records as listed by their collection
/// * `logs` - Audit entries fetched for the same entity type and scope
#[must_use]
pub fn correlate(records: Vec<DomainRecord>, logs: &[AuditLogEntry]) -> Vec<AnnotatedRecord> {
    let mut creations: HashMap<(&EntityType, i64), &AuditLogEntry> = HashMap::new();
    for log in logs.iter().filter(|log| log.action == AuditAction::Create) {
        if let Entry::Vacant(slot) = creations.entry((&log.entity_type, log.entity_id)) {
            slot.insert(log);
        }
    }

    records
        .into_iter()
        .map(|record| {
            let creation = creations
                .get(&(record.entity_type(), record.id()))
                .copied();
            let annotated = AnnotatedRecord::unannotated(record);
            match creation {
                Some(log) => annotated.with_creation(log),
                None => annotated,
            }
        })
        .collect()
}
