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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod actor;
mod entity;
mod error;
mod record;
mod timestamp;

#[cfg(test)]
mod tests;

// Re-export public types
pub use actor::{AuthenticatedActor, Role};
pub use entity::EntityType;
pub use error::DomainError;
pub use record::DomainRecord;
pub use timestamp::{
    ServerTimestamp, format_date, format_timestamp, parse_date, parse_server_timestamp,
    parse_timestamp, serde_timestamp,
};
