// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Operator roles for authorization.
///
/// Roles determine which audit entries an operator may reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Chain-wide administrator.
    ///
    /// Super admins see every branch and may undo any entry.
    SuperAdmin,
    /// Administrator of a single branch.
    ///
    /// Branch admins are scoped to their own branch; whether they may undo
    /// a colleague's entry depends on the entity type's undo policy.
    BranchAdmin,
}

impl Role {
    /// Converts this role to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::BranchAdmin => "branch_admin",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "branch_admin" => Ok(Self::BranchAdmin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in operator on whose behalf undo decisions are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedActor {
    /// The operator's user id.
    pub user_id: i64,
    /// The operator's role.
    pub role: Role,
    /// The branch the operator belongs to. Super admins usually have none.
    pub branch_id: Option<i64>,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The operator's user id
    /// * `role` - The operator's role
    /// * `branch_id` - The operator's own branch, if any
    #[must_use]
    pub const fn new(user_id: i64, role: Role, branch_id: Option<i64>) -> Self {
        Self {
            user_id,
            role,
            branch_id,
        }
    }

    /// Returns the branch this actor's reads should be scoped to.
    ///
    /// Branch admins are always scoped to their own branch. Super admins are
    /// scoped to whichever branch they selected, or to none (all branches).
    #[must_use]
    pub const fn scoped_branch(&self, selected_branch: Option<i64>) -> Option<i64> {
        match self.role {
            Role::BranchAdmin => self.branch_id,
            Role::SuperAdmin => selected_branch,
        }
    }
}
