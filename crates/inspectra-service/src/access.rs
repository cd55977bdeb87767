//! Shared authorization plumbing for the services.

use inspectra_core::access::MembershipSet;
use inspectra_core::error::InspectraResult;
use inspectra_core::models::principal::Principal;
use inspectra_core::repository::OrganizationRepository;

/// Resolve the principal's membership set with one store query.
///
/// Admins short-circuit to an empty set since `can_access` never
/// consults membership for them.
pub(crate) async fn membership_for<O: OrganizationRepository>(
    organizations: &O,
    principal: &Principal,
) -> InspectraResult<MembershipSet> {
    if principal.is_admin() {
        return Ok(MembershipSet::default());
    }
    let orgs = organizations.list_for_user(principal.id).await?;
    Ok(MembershipSet::new(orgs.into_iter().map(|o| o.id)))
}

/// Existence has already been established by the caller; this only
/// evaluates ownership.
pub(crate) async fn ensure_can_read<O: OrganizationRepository>(
    organizations: &O,
    principal: &Principal,
    org_id: uuid::Uuid,
) -> InspectraResult<()> {
    let membership = membership_for(organizations, principal).await?;
    inspectra_core::access::require_read(principal, org_id, &membership)
}
