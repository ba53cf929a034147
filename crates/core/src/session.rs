// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stock count session grouping.
//!
//! A stock count is submitted as one stock entry per product, all written
//! within a few seconds. The server keeps no session identifier, so sessions
//! are reconstructed by bucketing entries on their business date and the
//! minute they were created.
//!
//! ## Invariants
//!
//! - The session key is `{date}_{YYYY}-{MM}-{DD}_{HH}-{mm}`, built from the
//!   wall-clock fields of `created_at`. Timestamps the server wrote without
//!   an offset keep their fields as written; timestamps with an offset are
//!   converted into the grouper's timezone first
//! - Session membership does not depend on input order
//! - Entries within a session are newest first
//! - `all_undone` holds iff every entry in the session is undone
//!
//! Two counts submitted in the same minute for the same date merge, and a
//! count straddling a minute boundary splits. Both are accepted.

use crate::authorize::UndoAuthorizer;
use crate::correlate::AnnotatedRecord;
use crate::error::CoreError;
use backoffice_domain::{AuthenticatedActor, ServerTimestamp, format_date};
use chrono::{DateTime, Datelike, Timelike};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use time::{Date, OffsetDateTime};

/// A stock count reconstructed from its entries.
#[derive(Debug, Clone, PartialEq)]
pub struct StockCountSession {
    /// The composite session key.
    pub id: String,
    /// The business date counted.
    pub date: Date,
    /// Creation time of the first entry encountered.
    pub created_at: OffsetDateTime,
    /// Creator of the first entry encountered.
    pub user_name: Option<String>,
    /// The session's entries, newest first.
    pub entries: Vec<AnnotatedRecord>,
    /// Whether every entry has been undone.
    pub all_undone: bool,
}

impl StockCountSession {
    /// Number of entries in the session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the session has no entries.
    ///
    /// Sessions built by [`StockSessionGrouper::group`] are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Groups annotated stock entries into count sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockSessionGrouper {
    tz: Tz,
}

impl Default for StockSessionGrouper {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl StockSessionGrouper {
    /// Creates a grouper that buckets offset-carrying timestamps in `tz`.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Creates a grouper from an IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTimezone` if the name is not a known zone.
    pub fn from_timezone_name(name: &str) -> Result<Self, CoreError> {
        let tz: Tz = name
            .parse()
            .map_err(|_| CoreError::InvalidTimezone(name.to_string()))?;
        Ok(Self::new(tz))
    }

    /// The timezone offset-carrying timestamps are converted to.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Computes the session key of one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry has no business date or no creation
    /// timestamp.
    pub fn session_key(&self, entry: &AnnotatedRecord) -> Result<String, CoreError> {
        let (date, created_at) = session_fields(entry)?;
        let (year, month, day, hour, minute) = match created_at {
            ServerTimestamp::WallClock(naive) => (
                naive.year(),
                u32::from(u8::from(naive.month())),
                u32::from(naive.day()),
                u32::from(naive.hour()),
                u32::from(naive.minute()),
            ),
            ServerTimestamp::Zoned(ts) => {
                let local = self.to_local(entry.id(), ts)?;
                (
                    local.year(),
                    local.month(),
                    local.day(),
                    local.hour(),
                    local.minute(),
                )
            }
        };

        Ok(format!(
            "{}_{year:04}-{month:02}-{day:02}_{hour:02}-{minute:02}",
            format_date(date)
        ))
    }

    /// Groups entries into sessions, newest session first.
    ///
    /// Sessions are ordered by their representative `created_at`, newest
    /// first, with ties broken by key. Representative fields are taken from
    /// the first entry of each session in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry has no business date or no creation
    /// timestamp, or if a timestamp cannot be converted to the grouping
    /// timezone.
    pub fn group(
        &self,
        entries: Vec<AnnotatedRecord>,
    ) -> Result<Vec<StockCountSession>, CoreError> {
        let mut buckets: BTreeMap<String, Vec<AnnotatedRecord>> = BTreeMap::new();
        for entry in entries {
            let key = self.session_key(&entry)?;
            buckets.entry(key).or_default().push(entry);
        }

        let mut sessions: Vec<StockCountSession> = Vec::with_capacity(buckets.len());
        for (id, mut members) in buckets {
            let Some(first) = members.first() else {
                continue;
            };
            let (date, created_at) = session_fields(first)?;
            let created_at = created_at.instant();
            let user_name = first.created_by_user_name.clone();
            let all_undone = members.iter().all(|entry| entry.is_undone);

            members.sort_by(|a, b| {
                b.record
                    .created_at()
                    .cmp(&a.record.created_at())
                    .then_with(|| b.id().cmp(&a.id()))
            });

            sessions.push(StockCountSession {
                id,
                date,
                created_at,
                user_name,
                entries: members,
                all_undone,
            });
        }

        sessions.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sessions)
    }

    fn to_local(&self, entity_id: i64, created_at: OffsetDateTime) -> Result<DateTime<Tz>, CoreError> {
        DateTime::from_timestamp(created_at.unix_timestamp(), created_at.nanosecond())
            .map(|utc| utc.with_timezone(&self.tz))
            .ok_or(CoreError::TimestampOutOfRange { entity_id })
    }
}

/// Returns the log ids `actor` may undo within `session`.
///
/// Entries the actor cannot touch, or that are already undone, are skipped.
/// The ids follow the session's entry order.
#[must_use]
pub fn undoable_in_session(
    session: &StockCountSession,
    actor: &AuthenticatedActor,
    authorizer: &UndoAuthorizer,
) -> Vec<i64> {
    session
        .entries
        .iter()
        .filter(|entry| authorizer.can_undo(entry, actor))
        .filter_map(|entry| entry.log_id)
        .collect()
}

fn session_fields(entry: &AnnotatedRecord) -> Result<(Date, ServerTimestamp), CoreError> {
    let missing = |field: &'static str| CoreError::MissingSessionField {
        entity_type: entry.entity_type().to_string(),
        entity_id: entry.id(),
        field,
    };
    let date = entry.record.date().ok_or_else(|| missing("date"))?;
    let created_at = entry
        .record
        .server_created_at()
        .ok_or_else(|| missing("created_at"))?;
    Ok((date, created_at))
}
