// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use backoffice_domain::DomainError;

/// Errors that can occur while deriving undo state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// A record lacks a field session grouping depends on.
    MissingSessionField {
        /// The record's entity type.
        entity_type: String,
        /// The record id.
        entity_id: i64,
        /// The missing field.
        field: &'static str,
    },
    /// A timestamp cannot be represented in the grouping timezone.
    TimestampOutOfRange {
        /// The record id.
        entity_id: i64,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::MissingSessionField {
                entity_type,
                entity_id,
                field,
            } => write!(
                f,
                "{entity_type} {entity_id} has no '{field}' and cannot be grouped"
            ),
            Self::TimestampOutOfRange { entity_id } => {
                write!(f, "Timestamp of record {entity_id} is out of range")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
