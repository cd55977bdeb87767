//! Authorization engine.
//!
//! Access decisions are values, never panics: a denial maps to
//! [`InspectraError::Forbidden`] so callers can surface a 403
//! equivalent. Existence checks happen before authorization is
//! evaluated, so a missing resource surfaces as `NotFound` rather than
//! leaking through a deny.
//!
//! The model is deliberately small: a global `admin` role with full
//! read/write, and `user` principals whose membership set (organizations
//! where they are creator or member) grants read-only access to those
//! organizations' descendants. All writes are admin-only.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{InspectraError, InspectraResult};
use crate::models::principal::Principal;

/// The set of organization ids a user belongs to (as creator or
/// member). Computed with one store query, never per-record lookups.
#[derive(Debug, Clone, Default)]
pub struct MembershipSet(HashSet<Uuid>);

impl MembershipSet {
    pub fn new(org_ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self(org_ids.into_iter().collect())
    }

    pub fn contains(&self, org_id: Uuid) -> bool {
        self.0.contains(&org_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Organization ids for set-membership queries at the store layer.
    pub fn org_ids(&self) -> Vec<Uuid> {
        self.0.iter().copied().collect()
    }
}

/// Whether the principal may read resources owned by `org_id`.
pub fn can_access(principal: &Principal, org_id: Uuid, membership: &MembershipSet) -> bool {
    principal.is_admin() || membership.contains(org_id)
}

/// Gate for write operations: admin-only, regardless of membership.
pub fn require_admin(principal: &Principal) -> InspectraResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(InspectraError::Forbidden)
    }
}

/// Gate for read operations on a resource owned by `org_id`.
pub fn require_read(
    principal: &Principal,
    org_id: Uuid,
    membership: &MembershipSet,
) -> InspectraResult<()> {
    if can_access(principal, org_id, membership) {
        Ok(())
    } else {
        Err(InspectraError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::principal::Role;

    fn admin() -> Principal {
        Principal::new(Uuid::new_v4(), Role::Admin)
    }

    fn user() -> Principal {
        Principal::new(Uuid::new_v4(), Role::User)
    }

    #[test]
    fn admin_accesses_any_organization() {
        let org = Uuid::new_v4();
        assert!(can_access(&admin(), org, &MembershipSet::default()));
    }

    #[test]
    fn member_reads_only_their_organizations() {
        let mine = Uuid::new_v4();
        let other = Uuid::new_v4();
        let membership = MembershipSet::new([mine]);

        let p = user();
        assert!(can_access(&p, mine, &membership));
        assert!(!can_access(&p, other, &membership));
    }

    #[test]
    fn writes_are_admin_only() {
        assert!(require_admin(&admin()).is_ok());
        assert!(matches!(
            require_admin(&user()),
            Err(InspectraError::Forbidden)
        ));
    }

    #[test]
    fn require_read_denies_non_member() {
        let org = Uuid::new_v4();
        let err = require_read(&user(), org, &MembershipSet::default()).unwrap_err();
        assert!(matches!(err, InspectraError::Forbidden));
    }
}
