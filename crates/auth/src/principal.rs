//! Authenticated identity.

use serde::{Deserialize, Serialize};

use joyville_core::UserId;

use crate::Role;

/// An authenticated identity making a request.
///
/// Every core operation that cares about identity takes this as an explicit
/// argument; nothing reads ambient request state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn customer(user_id: UserId) -> Self {
        Self::new(user_id, Role::Customer)
    }

    pub fn superadmin(user_id: UserId) -> Self {
        Self::new(user_id, Role::Superadmin)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
