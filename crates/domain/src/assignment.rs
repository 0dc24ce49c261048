use civika_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::ids::{OrganisationId, ServiceId, UserId};
use crate::role::{Role, highest_role};
use crate::scope::RoleScope;

/// A persisted `(user, role, scope)` tuple.
///
/// The triple is unique in storage; re-granting an already-held assignment
/// is a no-op. Construction enforces the scope-exclusivity invariant: a
/// role can only be paired with the scope variant its category demands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleAssignment {
    user_id: UserId,
    role: Role,
    scope: RoleScope,
}

impl RoleAssignment {
    /// Creates a role assignment, rejecting role/scope category mismatches.
    pub fn new(user_id: UserId, role: Role, scope: RoleScope) -> AppResult<Self> {
        if role.category() != scope.category() {
            return Err(AppError::InvalidScope(format!(
                "role '{}' cannot be assigned at scope '{scope}'",
                role.as_str()
            )));
        }

        Ok(Self {
            user_id,
            role,
            scope,
        })
    }

    /// Returns the user holding the role.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the assigned role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the scope the role is held at.
    #[must_use]
    pub fn scope(&self) -> RoleScope {
        self.scope
    }
}

/// A materialised snapshot of one user's role assignments.
///
/// This is the cached counterpart to the storage-backed `has_role` query:
/// call sites that evaluate several predicates within one authorization
/// decision load the user's assignments once and query this value. The
/// snapshot can be stale relative to concurrent writes.
///
/// The implication chain between roles is evaluated here, in one place:
/// super admin implies global admin, content admin and every organisation
/// admin; organisation admin implies service admin for services under the
/// organisation; service admin implies service worker on the same service.
/// Global admin and content admin are siblings and imply nothing of each
/// other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    user_id: UserId,
    assignments: Vec<RoleAssignment>,
}

impl RoleSet {
    /// Creates a snapshot from a user's assignment rows. Rows belonging to
    /// other users are discarded.
    #[must_use]
    pub fn new(user_id: UserId, assignments: Vec<RoleAssignment>) -> Self {
        let assignments = assignments
            .into_iter()
            .filter(|assignment| assignment.user_id() == user_id)
            .collect();

        Self {
            user_id,
            assignments,
        }
    }

    /// Returns the user this snapshot belongs to.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the directly-held assignment rows.
    #[must_use]
    pub fn assignments(&self) -> &[RoleAssignment] {
        &self.assignments
    }

    /// Returns whether the role is directly held, at the exact scope when
    /// one is given or at any scope otherwise. No implication is applied.
    #[must_use]
    pub fn holds(&self, role: Role, scope: Option<RoleScope>) -> bool {
        self.assignments.iter().any(|assignment| {
            assignment.role() == role
                && scope.is_none_or(|expected| assignment.scope() == expected)
        })
    }

    /// Returns whether the user is a super admin.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.holds(Role::SuperAdmin, None)
    }

    /// Returns whether the user is a global admin, directly or as super admin.
    #[must_use]
    pub fn is_global_admin(&self) -> bool {
        self.holds(Role::GlobalAdmin, None) || self.is_super_admin()
    }

    /// Returns whether the user is a content admin, directly or as super admin.
    #[must_use]
    pub fn is_content_admin(&self) -> bool {
        self.holds(Role::ContentAdmin, None) || self.is_super_admin()
    }

    /// Returns whether the user administers the given organisation, or any
    /// organisation when `None` is passed.
    #[must_use]
    pub fn is_organisation_admin(&self, organisation: Option<OrganisationId>) -> bool {
        self.holds(
            Role::OrganisationAdmin,
            organisation.map(RoleScope::organisation),
        ) || self.is_super_admin()
    }

    /// Returns whether the user administers the given service, or any
    /// service when `None` is passed.
    ///
    /// `owning_organisation` must be the organisation owning `service`
    /// whenever `service` is given; it feeds the organisation-admin
    /// implication. With both arguments `None` the check means "service
    /// admin anywhere".
    #[must_use]
    pub fn is_service_admin(
        &self,
        service: Option<ServiceId>,
        owning_organisation: Option<OrganisationId>,
    ) -> bool {
        self.holds(Role::ServiceAdmin, service.map(RoleScope::service))
            || self.is_organisation_admin(owning_organisation)
    }

    /// Returns whether the user works on the given service, directly or via
    /// the service-admin implication. Argument meaning matches
    /// [`RoleSet::is_service_admin`].
    #[must_use]
    pub fn is_service_worker(
        &self,
        service: Option<ServiceId>,
        owning_organisation: Option<OrganisationId>,
    ) -> bool {
        self.holds(Role::ServiceWorker, service.map(RoleScope::service))
            || self.is_service_admin(service, owning_organisation)
    }

    /// Returns the organisations the user directly administers.
    #[must_use]
    pub fn organisation_admin_scopes(&self) -> Vec<OrganisationId> {
        self.assignments
            .iter()
            .filter(|assignment| assignment.role() == Role::OrganisationAdmin)
            .filter_map(|assignment| assignment.scope().organisation_id())
            .collect()
    }

    /// Returns the services the user directly administers.
    #[must_use]
    pub fn service_admin_scopes(&self) -> Vec<ServiceId> {
        self.assignments
            .iter()
            .filter(|assignment| assignment.role() == Role::ServiceAdmin)
            .filter_map(|assignment| assignment.scope().service_id())
            .collect()
    }

    /// Returns the single highest-ranked directly-held role, if any.
    #[must_use]
    pub fn highest_role(&self) -> Option<Role> {
        highest_role(self.assignments.iter().map(RoleAssignment::role))
    }
}

#[cfg(test)]
mod tests {
    use super::{RoleAssignment, RoleSet};
    use crate::ids::{OrganisationId, ServiceId, UserId};
    use crate::role::Role;
    use crate::scope::RoleScope;

    fn assignment(user_id: UserId, role: Role, scope: RoleScope) -> RoleAssignment {
        RoleAssignment::new(user_id, role, scope)
            .unwrap_or_else(|_| panic!("invalid test assignment"))
    }

    #[test]
    fn global_role_rejects_resource_scope() {
        let result = RoleAssignment::new(
            UserId::new(),
            Role::GlobalAdmin,
            RoleScope::organisation(OrganisationId::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn organisation_admin_rejects_service_scope() {
        let result = RoleAssignment::new(
            UserId::new(),
            Role::OrganisationAdmin,
            RoleScope::service(ServiceId::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn service_worker_rejects_global_scope() {
        let result = RoleAssignment::new(UserId::new(), Role::ServiceWorker, RoleScope::Global);
        assert!(result.is_err());
    }

    #[test]
    fn role_set_discards_foreign_rows() {
        let user_id = UserId::new();
        let other = assignment(UserId::new(), Role::ContentAdmin, RoleScope::Global);
        let set = RoleSet::new(user_id, vec![other]);
        assert!(set.assignments().is_empty());
    }

    #[test]
    fn holds_matches_exact_scope_or_any() {
        let user_id = UserId::new();
        let service_id = ServiceId::new();
        let set = RoleSet::new(
            user_id,
            vec![assignment(
                user_id,
                Role::ServiceWorker,
                RoleScope::service(service_id),
            )],
        );

        assert!(set.holds(Role::ServiceWorker, None));
        assert!(set.holds(Role::ServiceWorker, Some(RoleScope::service(service_id))));
        assert!(!set.holds(
            Role::ServiceWorker,
            Some(RoleScope::service(ServiceId::new()))
        ));
    }

    #[test]
    fn super_admin_implies_every_admin_check() {
        let user_id = UserId::new();
        let set = RoleSet::new(
            user_id,
            vec![assignment(user_id, Role::SuperAdmin, RoleScope::Global)],
        );

        assert!(set.is_global_admin());
        assert!(set.is_content_admin());
        assert!(set.is_organisation_admin(Some(OrganisationId::new())));
        assert!(set.is_service_admin(Some(ServiceId::new()), None));
        assert!(set.is_service_worker(Some(ServiceId::new()), None));
    }

    #[test]
    fn global_admin_does_not_imply_content_admin() {
        let user_id = UserId::new();
        let set = RoleSet::new(
            user_id,
            vec![assignment(user_id, Role::GlobalAdmin, RoleScope::Global)],
        );

        assert!(set.is_global_admin());
        assert!(!set.is_content_admin());
    }

    #[test]
    fn organisation_admin_implies_service_roles_under_it() {
        let user_id = UserId::new();
        let organisation_id = OrganisationId::new();
        let service_id = ServiceId::new();
        let set = RoleSet::new(
            user_id,
            vec![assignment(
                user_id,
                Role::OrganisationAdmin,
                RoleScope::organisation(organisation_id),
            )],
        );

        assert!(set.is_service_admin(Some(service_id), Some(organisation_id)));
        assert!(set.is_service_worker(Some(service_id), Some(organisation_id)));
        assert!(!set.is_service_admin(Some(service_id), Some(OrganisationId::new())));
    }

    #[test]
    fn highest_role_reports_the_top_direct_role() {
        let user_id = UserId::new();
        let service_id = ServiceId::new();
        let set = RoleSet::new(
            user_id,
            vec![
                assignment(user_id, Role::ServiceWorker, RoleScope::service(service_id)),
                assignment(user_id, Role::ServiceAdmin, RoleScope::service(service_id)),
            ],
        );

        assert_eq!(set.highest_role(), Some(Role::ServiceAdmin));
    }
}
