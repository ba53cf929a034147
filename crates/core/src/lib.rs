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

//! Client-side undo logic for the restaurant back office.
//!
//! The server keeps an append-only audit log next to each business
//! collection but offers no join between them. This crate rebuilds record
//! provenance from the two independently fetched lists, decides whether an
//! operator may reverse a record, and clusters stock count lines into the
//! counting sessions they were entered in.
//!
//! Everything here is pure. Fetching and undo requests live in
//! `backoffice-api`.

mod activity;
mod authorize;
mod correlate;
mod error;
mod session;

#[cfg(test)]
mod tests;

pub use activity::filter_by_month;
pub use authorize::{Capability, UndoAuthorizer, UndoPolicy, UndoPolicyTable};
pub use correlate::{AnnotatedRecord, correlate};
pub use error::CoreError;
pub use session::{StockCountSession, StockSessionGrouper, undoable_in_session};
