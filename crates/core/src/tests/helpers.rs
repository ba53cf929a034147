// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::AnnotatedRecord;
use backoffice_audit::{AuditAction, AuditLogEntry};
use backoffice_domain::{
    AuthenticatedActor, DomainRecord, EntityType, Role, ServerTimestamp, parse_server_timestamp,
};
use time::macros::{date, datetime};

pub fn create_test_super_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(1, Role::SuperAdmin, None)
}

pub fn create_test_branch_admin(user_id: i64, branch_id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(user_id, Role::BranchAdmin, Some(branch_id))
}

pub fn create_test_record(entity_type: EntityType, id: i64, branch_id: i64) -> DomainRecord {
    DomainRecord::new(entity_type, id, branch_id)
}

pub fn create_test_create_log(
    id: i64,
    entity_type: EntityType,
    entity_id: i64,
    user_id: i64,
) -> AuditLogEntry {
    AuditLogEntry::new(
        id,
        datetime!(2024-01-10 09:00:00 UTC),
        Some(1),
        user_id,
        &format!("user-{user_id}"),
        entity_type,
        entity_id,
        AuditAction::Create,
    )
}

/// An annotated record with a live `create` entry.
pub fn create_test_annotated(
    entity_type: EntityType,
    id: i64,
    branch_id: i64,
    created_by: i64,
) -> AnnotatedRecord {
    let log = create_test_create_log(1000 + id, entity_type.clone(), id, created_by);
    AnnotatedRecord::unannotated(create_test_record(entity_type, id, branch_id)).with_creation(&log)
}

/// An annotated stock entry for 2024-01-10 created at `created_at`.
pub fn create_test_stock_entry(id: i64, created_at: &str, is_undone: bool) -> AnnotatedRecord {
    let created_at: ServerTimestamp = parse_server_timestamp(created_at).unwrap();
    let record = DomainRecord::new(EntityType::StockEntry, id, 1)
        .with_date(date!(2024 - 01 - 10))
        .with_created_at(created_at);
    let mut annotated = AnnotatedRecord::unannotated(record)
        .with_creation(&create_test_create_log(1000 + id, EntityType::StockEntry, id, 42));
    annotated.is_undone = is_undone;
    annotated
}

pub fn session_members(sessions: &[crate::StockCountSession]) -> Vec<(String, Vec<i64>)> {
    let mut members: Vec<(String, Vec<i64>)> = sessions
        .iter()
        .map(|session| {
            let mut ids: Vec<i64> = session.entries.iter().map(AnnotatedRecord::id).collect();
            ids.sort_unstable();
            (session.id.clone(), ids)
        })
        .collect();
    members.sort();
    members
}
