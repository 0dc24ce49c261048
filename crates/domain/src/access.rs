//! Cross-actor authorization predicates.
//!
//! Each predicate compares an invoker's role snapshot against a subject's.
//! The rules are evaluated strictly in the order written: super admin is
//! unconditional, global and content admins short-circuit to `false`
//! regardless of context (they manage users through a different path), and
//! the scoped rules only fire when their scope argument is present.

use crate::assignment::RoleSet;
use crate::ids::{OrganisationId, ServiceId};

/// Returns whether `invoker` may revoke a role held by `subject`.
///
/// `organisation` and `service` give the scope the revocation happens in;
/// when `service` is supplied, `organisation` must be the organisation
/// owning that service. The exact role being revoked does not matter, only
/// that the subject is not above the invoker in the hierarchy.
#[must_use]
pub fn can_revoke_role(
    invoker: &RoleSet,
    subject: &RoleSet,
    organisation: Option<OrganisationId>,
    service: Option<ServiceId>,
) -> bool {
    if invoker.is_super_admin() {
        return true;
    }

    if invoker.is_global_admin() {
        return false;
    }

    if invoker.is_content_admin() {
        return false;
    }

    if organisation.is_some()
        && invoker.is_organisation_admin(organisation)
        && !(subject.is_super_admin() || subject.is_global_admin() || subject.is_content_admin())
    {
        return true;
    }

    if service.is_some()
        && invoker.is_service_admin(service, organisation)
        && !subject.is_organisation_admin(organisation)
    {
        return true;
    }

    false
}

/// Returns whether `invoker` may update `subject`'s account.
///
/// Self-service is always allowed; otherwise the same precedence as
/// [`can_revoke_role`] applies, with the scoped rules relaxed to "admin of
/// any organisation" and "admin of any service".
#[must_use]
pub fn can_update(invoker: &RoleSet, subject: &RoleSet) -> bool {
    if invoker.user_id() == subject.user_id() {
        return true;
    }

    if invoker.is_super_admin() {
        return true;
    }

    if invoker.is_global_admin() {
        return false;
    }

    if invoker.is_content_admin() {
        return false;
    }

    if invoker.is_organisation_admin(None)
        && !(subject.is_super_admin() || subject.is_global_admin() || subject.is_content_admin())
    {
        return true;
    }

    if invoker.is_service_admin(None, None)
        && !(subject.is_super_admin()
            || subject.is_global_admin()
            || subject.is_content_admin()
            || subject.is_organisation_admin(None))
    {
        return true;
    }

    false
}

/// Returns whether `invoker` may delete `subject`'s account. Same rule as
/// [`can_update`], named separately for call-site clarity.
#[must_use]
pub fn can_delete(invoker: &RoleSet, subject: &RoleSet) -> bool {
    can_update(invoker, subject)
}

#[cfg(test)]
mod tests {
    use super::{can_delete, can_revoke_role, can_update};
    use crate::assignment::{RoleAssignment, RoleSet};
    use crate::ids::{OrganisationId, ServiceId, UserId};
    use crate::role::Role;
    use crate::scope::RoleScope;

    fn holder(role: Role, scope: RoleScope) -> RoleSet {
        let user_id = UserId::new();
        let assignment = RoleAssignment::new(user_id, role, scope)
            .unwrap_or_else(|_| panic!("invalid test assignment"));
        RoleSet::new(user_id, vec![assignment])
    }

    fn nobody() -> RoleSet {
        RoleSet::new(UserId::new(), Vec::new())
    }

    #[test]
    fn anyone_can_update_self() {
        for role in Role::all() {
            let scope = match role.category() {
                crate::role::RoleCategory::Global => RoleScope::Global,
                crate::role::RoleCategory::OrganisationScoped => {
                    RoleScope::organisation(OrganisationId::new())
                }
                crate::role::RoleCategory::ServiceScoped => RoleScope::service(ServiceId::new()),
            };
            let user = holder(*role, scope);
            assert!(can_update(&user, &user), "self-update failed for {role:?}");
        }
    }

    #[test]
    fn super_admin_can_revoke_anyone() {
        let invoker = holder(Role::SuperAdmin, RoleScope::Global);
        let subject = holder(Role::GlobalAdmin, RoleScope::Global);
        assert!(can_revoke_role(&invoker, &subject, None, None));
    }

    #[test]
    fn global_admin_can_revoke_nobody() {
        let invoker = holder(Role::GlobalAdmin, RoleScope::Global);
        let organisation_id = OrganisationId::new();
        let service_id = ServiceId::new();
        let worker = holder(Role::ServiceWorker, RoleScope::service(service_id));

        assert!(!can_revoke_role(&invoker, &worker, None, None));
        assert!(!can_revoke_role(
            &invoker,
            &worker,
            Some(organisation_id),
            Some(service_id)
        ));
    }

    #[test]
    fn content_admin_can_revoke_nobody() {
        let invoker = holder(Role::ContentAdmin, RoleScope::Global);
        let subject = nobody();
        assert!(!can_revoke_role(&invoker, &subject, Some(OrganisationId::new()), None));
    }

    #[test]
    fn organisation_admin_can_revoke_lower_ranked_in_scope() {
        let organisation_id = OrganisationId::new();
        let invoker = holder(
            Role::OrganisationAdmin,
            RoleScope::organisation(organisation_id),
        );
        let subject = holder(Role::ServiceWorker, RoleScope::service(ServiceId::new()));

        assert!(can_revoke_role(&invoker, &subject, Some(organisation_id), None));
    }

    #[test]
    fn organisation_admin_cannot_revoke_global_admin() {
        let organisation_id = OrganisationId::new();
        let invoker = holder(
            Role::OrganisationAdmin,
            RoleScope::organisation(organisation_id),
        );
        let subject = holder(Role::GlobalAdmin, RoleScope::Global);

        assert!(!can_revoke_role(&invoker, &subject, Some(organisation_id), None));
    }

    #[test]
    fn organisation_admin_without_scope_argument_cannot_revoke() {
        let invoker = holder(
            Role::OrganisationAdmin,
            RoleScope::organisation(OrganisationId::new()),
        );
        let subject = nobody();
        assert!(!can_revoke_role(&invoker, &subject, None, None));
    }

    #[test]
    fn service_admin_can_revoke_worker_on_their_service() {
        let organisation_id = OrganisationId::new();
        let service_id = ServiceId::new();
        let invoker = holder(Role::ServiceAdmin, RoleScope::service(service_id));
        let subject = holder(Role::ServiceWorker, RoleScope::service(service_id));

        assert!(can_revoke_role(
            &invoker,
            &subject,
            Some(organisation_id),
            Some(service_id)
        ));
    }

    #[test]
    fn service_admin_cannot_revoke_owning_organisation_admin() {
        let organisation_id = OrganisationId::new();
        let service_id = ServiceId::new();
        let invoker = holder(Role::ServiceAdmin, RoleScope::service(service_id));
        let subject = holder(
            Role::OrganisationAdmin,
            RoleScope::organisation(organisation_id),
        );

        assert!(!can_revoke_role(
            &invoker,
            &subject,
            Some(organisation_id),
            Some(service_id)
        ));
    }

    #[test]
    fn organisation_admin_can_update_unprivileged_user() {
        let invoker = holder(
            Role::OrganisationAdmin,
            RoleScope::organisation(OrganisationId::new()),
        );
        assert!(can_update(&invoker, &nobody()));
    }

    #[test]
    fn service_admin_cannot_update_organisation_admin() {
        let invoker = holder(Role::ServiceAdmin, RoleScope::service(ServiceId::new()));
        let subject = holder(
            Role::OrganisationAdmin,
            RoleScope::organisation(OrganisationId::new()),
        );
        assert!(!can_update(&invoker, &subject));
    }

    #[test]
    fn global_admin_cannot_update_anyone_else() {
        let invoker = holder(Role::GlobalAdmin, RoleScope::Global);
        assert!(!can_update(&invoker, &nobody()));
    }

    #[test]
    fn delete_mirrors_update() {
        let invoker = holder(Role::SuperAdmin, RoleScope::Global);
        let subject = holder(Role::ContentAdmin, RoleScope::Global);
        assert_eq!(
            can_delete(&invoker, &subject),
            can_update(&invoker, &subject)
        );
    }
}
