// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use backoffice_audit::AuditLogEntry;
use time::Month;

/// Keeps the audit entries created in the given calendar month.
///
/// Months are taken from the wall-clock `created_at` the server reported.
/// Input order is preserved.
#[must_use]
pub fn filter_by_month(logs: &[AuditLogEntry], year: i32, month: Month) -> Vec<AuditLogEntry> {
    logs.iter()
        .filter(|log| log.created_at.year() == year && log.created_at.month() == month)
        .cloned()
        .collect()
}
