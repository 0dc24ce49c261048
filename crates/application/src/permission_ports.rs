use async_trait::async_trait;

use civika_core::AppResult;
use civika_domain::{OrganisationId, Role, RoleAssignment, RoleScope, ServiceId, UserId};

/// A role the user must not hold for a guarded removal to proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeGuard {
    /// The implying role that blocks the removal.
    pub role: Role,
    /// Scope the implying role is checked at; `None` means any scope.
    pub scope: Option<RoleScope>,
}

/// Outcome of a guarded assignment removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// The assignment was deleted, or was not held to begin with.
    Removed,
    /// The guard role is held; nothing was deleted.
    Blocked,
}

/// Storage port for `(user, role, scope)` assignment rows.
///
/// Rows are unique per triple. Implementations must make `insert_all`
/// atomic and race-tolerant: a concurrent insert of the same triple is a
/// success, not an error, so grant cascades are safe under at-least-once
/// retry.
#[async_trait]
pub trait RoleAssignmentRepository: Send + Sync {
    /// Inserts every assignment in one atomic write, skipping rows that
    /// already exist.
    async fn insert_all(&self, assignments: Vec<RoleAssignment>) -> AppResult<()>;

    /// Returns whether the user holds the role, at the exact scope when one
    /// is given or at any scope otherwise.
    async fn exists(
        &self,
        user_id: UserId,
        role: Role,
        scope: Option<RoleScope>,
    ) -> AppResult<bool>;

    /// Deletes the exact `(user, role, scope)` row unless the guard role is
    /// held. The guard check and the delete happen against the same state,
    /// within one storage transaction.
    async fn remove_guarded(
        &self,
        user_id: UserId,
        role: Role,
        scope: RoleScope,
        guard: Option<RevokeGuard>,
    ) -> AppResult<RevokeOutcome>;

    /// Lists every assignment held by the user.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>>;

    /// Lists every user id known to the assignment store.
    async fn all_user_ids(&self) -> AppResult<Vec<UserId>>;

    /// Lists users holding the given role (or any role when `None`) at the
    /// exact scope.
    async fn user_ids_for_scope(
        &self,
        scope: RoleScope,
        role: Option<Role>,
    ) -> AppResult<Vec<UserId>>;

    /// Lists users holding any role scoped to one of `service_ids`,
    /// excluding users who hold one of `excluded_roles` at any scope.
    async fn user_ids_for_services(
        &self,
        service_ids: &[ServiceId],
        excluded_roles: &[Role],
    ) -> AppResult<Vec<UserId>>;
}

/// Read-only port onto the directory's containment hierarchy.
///
/// Backed by the directory database; answers reflect the hierarchy at call
/// time and are never cached by the engine beyond one operation.
#[async_trait]
pub trait DirectoryHierarchy: Send + Sync {
    /// Lists the services currently under an organisation.
    async fn services_under(&self, organisation_id: OrganisationId) -> AppResult<Vec<ServiceId>>;

    /// Returns the organisation currently owning a service.
    async fn organisation_of(&self, service_id: ServiceId) -> AppResult<OrganisationId>;

    /// Lists every organisation in the directory.
    async fn organisation_ids(&self) -> AppResult<Vec<OrganisationId>>;
}
