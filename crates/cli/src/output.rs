// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain-text rendering of command results.

use backoffice_api::{BatchUndoReport, CancellableOperationState};
use backoffice_audit::{AuditAction, AuditLogEntry};
use backoffice_domain::{AuthenticatedActor, format_date, format_timestamp};
use backoffice_undo::{AnnotatedRecord, StockCountSession, UndoAuthorizer};
use std::fmt::Write;

/// Display text for an audit action.
pub const fn action_label(action: AuditAction) -> &'static str {
    match action {
        AuditAction::Create => "Created",
        AuditAction::Update => "Updated",
        AuditAction::Delete => "Deleted",
        AuditAction::Undo => "Undone",
    }
}

fn undo_state(
    record: &AnnotatedRecord,
    actor: &AuthenticatedActor,
    authorizer: &UndoAuthorizer,
) -> &'static str {
    if record.is_undone {
        "undone"
    } else if authorizer.can_undo(record, actor) {
        "undoable"
    } else {
        "-"
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| String::from("-"), |value| value.to_string())
}

pub fn render_records(
    records: &[AnnotatedRecord],
    actor: &AuthenticatedActor,
    authorizer: &UndoAuthorizer,
) -> String {
    let mut out = String::from("ID\tBRANCH\tCREATED BY\tLOG\tUNDO\n");
    for record in records {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            record.id(),
            record.branch_id(),
            optional(record.created_by_user_name.as_deref()),
            optional(record.log_id),
            undo_state(record, actor, authorizer)
        );
    }
    out
}

pub fn render_sessions(
    sessions: &[StockCountSession],
    actor: &AuthenticatedActor,
    authorizer: &UndoAuthorizer,
) -> String {
    let mut out = String::new();
    for session in sessions {
        let state = if session.all_undone { " [undone]" } else { "" };
        let _ = writeln!(
            out,
            "{}  date {}  at {}  by {}  {} items{state}",
            session.id,
            format_date(session.date),
            format_timestamp(session.created_at),
            optional(session.user_name.as_deref()),
            session.len()
        );
        for entry in &session.entries {
            let _ = writeln!(
                out,
                "    #{}  log {}  {}",
                entry.id(),
                optional(entry.log_id),
                undo_state(entry, actor, authorizer)
            );
        }
    }
    out
}

pub fn render_activity(logs: &[AuditLogEntry]) -> String {
    let mut out = String::new();
    for log in logs {
        let undone = if log.is_undone { " (undone)" } else { "" };
        let _ = writeln!(
            out,
            "{}  {:<8} {} #{}  {}{undone}",
            format_timestamp(log.created_at),
            action_label(log.action),
            log.entity_type,
            log.entity_id,
            log.description
        );
    }
    out
}

pub fn render_batch_report(report: &BatchUndoReport) -> String {
    if report.attempted() == 0 {
        return String::from("Nothing to undo in this session.");
    }
    match report.first_error_message() {
        None => format!("Undid all {} entries.", report.succeeded.len()),
        Some(message) => format!(
            "Undid {} of {} entries. First error: {message}",
            report.succeeded.len(),
            report.attempted()
        ),
    }
}

pub fn render_import_state(state: &CancellableOperationState) -> String {
    let mut out = state
        .message
        .clone()
        .unwrap_or_else(|| state.status.to_string());
    for error in &state.errors {
        let _ = write!(out, "\n  {error}");
    }
    out
}
