// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp and calendar date parsing for server payloads.
//!
//! The back-office API is not consistent about time formats:
//!
//! - audit logs and list endpoints emit `YYYY-MM-DD HH:MM:SS` in the server's
//!   wall clock, with no offset
//! - some collections emit RFC 3339 timestamps with an offset
//! - business dates are `YYYY-MM-DD`, occasionally as a full timestamp at
//!   midnight
//!
//! Offset-less timestamps are taken as UTC so their wall-clock fields are
//! preserved exactly.

use crate::error::DomainError;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

const SERVER_DATETIME: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const NAIVE_ISO_DATETIME: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

const CALENDAR_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// A server timestamp, remembering whether it carried an offset.
///
/// Offset-less timestamps are the server's own wall clock. Their fields are
/// meaningful as written and must not be shifted into another zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerTimestamp {
    /// Written with an explicit offset.
    Zoned(OffsetDateTime),
    /// Written without an offset.
    WallClock(PrimitiveDateTime),
}

impl ServerTimestamp {
    /// The timestamp as an instant. Wall-clock values are taken as UTC.
    #[must_use]
    pub const fn instant(self) -> OffsetDateTime {
        match self {
            Self::Zoned(ts) => ts,
            Self::WallClock(naive) => naive.assume_utc(),
        }
    }

    /// Returns whether the timestamp was written without an offset.
    #[must_use]
    pub const fn is_wall_clock(self) -> bool {
        matches!(self, Self::WallClock(_))
    }
}

impl From<OffsetDateTime> for ServerTimestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self::Zoned(value)
    }
}

/// Parses a server timestamp, keeping track of whether it had an offset.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS[.fff]`.
///
/// # Errors
///
/// Returns `DomainError::TimestampParseError` if no format matches.
pub fn parse_server_timestamp(value: &str) -> Result<ServerTimestamp, DomainError> {
    let trimmed = value.trim();

    if let Ok(ts) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(ServerTimestamp::Zoned(ts));
    }

    for format in [SERVER_DATETIME, NAIVE_ISO_DATETIME] {
        if let Ok(naive) = PrimitiveDateTime::parse(trimmed, format) {
            return Ok(ServerTimestamp::WallClock(naive));
        }
    }

    Err(DomainError::TimestampParseError {
        value: value.to_string(),
    })
}

/// Parses a server timestamp as an instant.
///
/// Offset-less timestamps are taken as UTC; see [`parse_server_timestamp`].
///
/// # Errors
///
/// Returns `DomainError::TimestampParseError` if no format matches.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    parse_server_timestamp(value).map(ServerTimestamp::instant)
}

/// Parses a business date.
///
/// Accepts `YYYY-MM-DD`, or any timestamp [`parse_timestamp`] accepts, in
/// which case the date part as written is used.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the value is neither form.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    let trimmed = value.trim();

    match Date::parse(trimmed, CALENDAR_DATE) {
        Ok(date) => Ok(date),
        Err(err) => parse_timestamp(trimmed)
            .map(OffsetDateTime::date)
            .map_err(|_| DomainError::DateParseError {
                date_string: value.to_string(),
                error: err.to_string(),
            }),
    }
}

/// Formats a timestamp the way the server does (`YYYY-MM-DD HH:MM:SS`).
///
/// The timestamp's own offset is kept; no conversion happens.
#[must_use]
pub fn format_timestamp(value: OffsetDateTime) -> String {
    value.format(SERVER_DATETIME).unwrap_or_default()
}

/// Formats a business date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(value: Date) -> String {
    value.format(CALENDAR_DATE).unwrap_or_default()
}

/// Serde adapter for required server timestamps.
///
/// Deserializes any format [`parse_timestamp`] accepts and serializes as
/// RFC 3339.
pub mod serde_timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    /// Serializes a timestamp as RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp cannot be formatted.
    pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes a server timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a string in a known format.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_timestamp(&text).map_err(serde::de::Error::custom)
    }

    /// Serde adapter for optional server timestamps.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::OffsetDateTime;
        use time::format_description::well_known::Rfc3339;

        /// Serializes an optional timestamp as RFC 3339 or `null`.
        ///
        /// # Errors
        ///
        /// Returns an error if the timestamp cannot be formatted.
        pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(ts) => {
                    let text = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                    serializer.serialize_some(&text)
                }
                None => serializer.serialize_none(),
            }
        }

        /// Deserializes an optional server timestamp. Empty strings read as `None`.
        ///
        /// # Errors
        ///
        /// Returns an error if a present value is not in a known format.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let text: Option<String> = Option::deserialize(deserializer)?;
            match text.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(value) => super::super::parse_timestamp(value)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_parse_server_format_is_taken_as_utc() {
        let ts = parse_timestamp("2024-01-10 09:00:12").unwrap();
        assert_eq!(ts, datetime!(2024-01-10 09:00:12 UTC));
    }

    #[test]
    fn test_parse_rfc3339_keeps_offset() {
        let ts = parse_timestamp("2024-01-10T09:00:12+03:00").unwrap();
        assert_eq!(ts, datetime!(2024-01-10 09:00:12 +03:00));
        assert_eq!(ts.hour(), 9);
    }

    #[test]
    fn test_parse_naive_iso_with_fraction() {
        let ts = parse_timestamp("2024-01-10T09:00:12.250").unwrap();
        assert_eq!(ts.second(), 12);
        assert_eq!(ts.millisecond(), 250);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert_eq!(
            err,
            DomainError::TimestampParseError {
                value: String::from("yesterday")
            }
        );
    }

    #[test]
    fn test_server_timestamp_tracks_offset() {
        let naive = parse_server_timestamp("2024-01-10 23:30:10").unwrap();
        assert!(naive.is_wall_clock());
        assert_eq!(naive.instant(), datetime!(2024-01-10 23:30:10 UTC));

        let zoned = parse_server_timestamp("2024-01-10T23:30:10Z").unwrap();
        assert!(!zoned.is_wall_clock());
    }

    #[test]
    fn test_parse_date_plain_and_from_timestamp() {
        assert_eq!(parse_date("2024-01-10").unwrap(), date!(2024 - 01 - 10));
        assert_eq!(
            parse_date("2024-01-10T00:00:00Z").unwrap(),
            date!(2024 - 01 - 10)
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(
            parse_date("10/01/2024"),
            Err(DomainError::DateParseError { .. })
        ));
    }

    #[test]
    fn test_format_matches_server_layout() {
        assert_eq!(
            format_timestamp(datetime!(2024-01-10 09:05:07 UTC)),
            "2024-01-10 09:05:07"
        );
        assert_eq!(format_date(date!(2024 - 03 - 01)), "2024-03-01");
    }
}
