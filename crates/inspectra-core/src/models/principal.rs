//! Authenticated principal.
//!
//! Principals are produced by an external credential/session subsystem
//! and trusted as given; the core never inspects passwords or tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access role carried by a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Global administrator — full read/write on every organization.
    Admin,
    /// Regular user — read access to organizations they belong to.
    User,
}

/// The authenticated actor driving an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
