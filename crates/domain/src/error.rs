// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while interpreting back-office domain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Role string is not one of the known operator roles.
    InvalidRole(String),
    /// A domain record payload was not a JSON object.
    InvalidRecord {
        /// The entity type the record was read as.
        entity_type: String,
        /// Description of what was received instead.
        reason: String,
    },
    /// A required field is missing from a domain record.
    MissingField {
        /// The entity type the record was read as.
        entity_type: String,
        /// The missing field name.
        field: &'static str,
    },
    /// A field is present but has the wrong shape.
    InvalidField {
        /// The entity type the record was read as.
        entity_type: String,
        /// The offending field name.
        field: &'static str,
        /// A human-readable description of the problem.
        message: String,
    },
    /// Failed to parse a timestamp string.
    TimestampParseError {
        /// The invalid timestamp string.
        value: String,
    },
    /// Failed to parse a calendar date string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(role) => write!(f, "Invalid role: {role}"),
            Self::InvalidRecord {
                entity_type,
                reason,
            } => write!(f, "Invalid {entity_type} record: {reason}"),
            Self::MissingField { entity_type, field } => {
                write!(f, "{entity_type} record is missing field '{field}'")
            }
            Self::InvalidField {
                entity_type,
                field,
                message,
            } => write!(f, "{entity_type} record has invalid '{field}': {message}"),
            Self::TimestampParseError { value } => {
                write!(f, "Failed to parse timestamp '{value}'")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
