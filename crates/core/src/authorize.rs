// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Undo authorization.
//!
//! Whether an operator may reverse a record is decided in three steps:
//!
//! 1. Records without a live `create` entry are never undoable.
//! 2. Super admins may undo anything else.
//! 3. Branch admins are governed by the entity type's [`UndoPolicy`].
//!
//! The answer is advisory. The server re-validates every undo request.

use crate::correlate::AnnotatedRecord;
use backoffice_domain::{AuthenticatedActor, EntityType, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The answer of an undo check for one record.
///
/// [`UndoAuthorizer::capability`] returns this so the UI layer can carry a
/// decision per record; it serializes as the record's plain `can_undo`
/// flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "bool")]
pub enum Capability {
    /// The operator may undo the record.
    Allowed,
    /// The operator may not undo the record, or there is nothing to undo.
    #[default]
    Denied,
}

impl Capability {
    /// Returns whether the undo may be offered.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Turns a policy check into a capability.
    #[must_use]
    pub const fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allowed } else { Self::Denied }
    }
}

impl From<Capability> for bool {
    fn from(value: Capability) -> Self {
        value.is_allowed()
    }
}

/// Who, besides a super admin, may undo records of one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoPolicy {
    /// Any branch admin of the record's branch.
    BranchWide,
    /// Only the operator who created the record.
    AuthorOnly,
}

/// Per-entity-type undo policies with a fallback for unlisted types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoPolicyTable {
    policies: HashMap<EntityType, UndoPolicy>,
    fallback: UndoPolicy,
}

impl UndoPolicyTable {
    /// Creates a table that applies one policy to every entity type.
    #[must_use]
    pub fn uniform(policy: UndoPolicy) -> Self {
        Self {
            policies: HashMap::new(),
            fallback: policy,
        }
    }

    /// Overrides the policy for one entity type.
    #[must_use]
    pub fn with_policy(mut self, entity_type: EntityType, policy: UndoPolicy) -> Self {
        self.policies.insert(entity_type, policy);
        self
    }

    /// Returns the policy governing an entity type.
    #[must_use]
    pub fn policy_for(&self, entity_type: &EntityType) -> UndoPolicy {
        self.policies
            .get(entity_type)
            .copied()
            .unwrap_or(self.fallback)
    }
}

impl Default for UndoPolicyTable {
    /// The policies the back office has always applied.
    ///
    /// Stock counts and central shipments are branch-wide; everything else
    /// the back office lists is author-only. Unlisted types are branch-wide.
    fn default() -> Self {
        Self::uniform(UndoPolicy::BranchWide)
            .with_policy(EntityType::StockEntry, UndoPolicy::BranchWide)
            .with_policy(EntityType::CenterShipment, UndoPolicy::BranchWide)
            .with_policy(EntityType::Shipment, UndoPolicy::AuthorOnly)
            .with_policy(EntityType::WasteEntry, UndoPolicy::AuthorOnly)
            .with_policy(EntityType::CashMovement, UndoPolicy::AuthorOnly)
            .with_policy(EntityType::Expense, UndoPolicy::AuthorOnly)
            .with_policy(EntityType::ProducePurchase, UndoPolicy::AuthorOnly)
            .with_policy(EntityType::ProducePayment, UndoPolicy::AuthorOnly)
    }
}

/// Decides whether an operator may undo an annotated record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoAuthorizer {
    policies: UndoPolicyTable,
}

impl UndoAuthorizer {
    /// Creates an authorizer backed by the given policy table.
    #[must_use]
    pub const fn new(policies: UndoPolicyTable) -> Self {
        Self { policies }
    }

    /// The policy table in use.
    #[must_use]
    pub const fn policies(&self) -> &UndoPolicyTable {
        &self.policies
    }

    /// Computes the undo capability of `actor` on `record`.
    ///
    /// # Arguments
    ///
    /// * `record` - The annotated record
    /// * `actor` - The signed-in operator
    ///
    /// # Returns
    ///
    /// * `Capability::Denied` if the record has no `create` entry or it was
    ///   already undone, whatever the role
    /// * `Capability::Allowed` for super admins otherwise
    /// * the entity type's policy outcome for branch admins
    #[must_use]
    pub fn capability(&self, record: &AnnotatedRecord, actor: &AuthenticatedActor) -> Capability {
        if record.log_id.is_none() || record.is_undone {
            return Capability::Denied;
        }

        match actor.role {
            Role::SuperAdmin => Capability::Allowed,
            Role::BranchAdmin => match self.policies.policy_for(record.entity_type()) {
                UndoPolicy::BranchWide => {
                    Capability::from_bool(actor.branch_id == Some(record.branch_id()))
                }
                UndoPolicy::AuthorOnly => {
                    Capability::from_bool(record.created_by_user_id == Some(actor.user_id))
                }
            },
        }
    }

    /// Returns whether `actor` may undo `record`.
    #[must_use]
    pub fn can_undo(&self, record: &AnnotatedRecord, actor: &AuthenticatedActor) -> bool {
        self.capability(record, actor).is_allowed()
    }
}
