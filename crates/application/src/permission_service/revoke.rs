use civika_core::{AppError, AppResult};
use civika_domain::{OrganisationId, Role, RoleScope, ServiceId, UserId};

use super::PermissionService;
use crate::permission_ports::{RevokeGuard, RevokeOutcome};

impl PermissionService {
    /// Revokes exactly one `(user, role, scope)` assignment.
    ///
    /// A guard is checked first: the revoke is rejected with
    /// [`AppError::CannotRevokeRole`] while the user still holds a role that
    /// implies the one being removed. Passing the guard never cascades —
    /// assignments the role previously fanned out stay in place, since they
    /// may have been granted independently.
    pub async fn revoke(&self, user_id: UserId, role: Role, scope: RoleScope) -> AppResult<()> {
        if role.category() != scope.category() {
            return Err(AppError::InvalidScope(format!(
                "role '{}' cannot be revoked at scope '{scope}'",
                role.as_str()
            )));
        }

        let (guard, reason) = self.revoke_guard(role, scope).await?;

        match self
            .assignments
            .remove_guarded(user_id, role, scope, guard)
            .await?
        {
            RevokeOutcome::Removed => Ok(()),
            RevokeOutcome::Blocked => Err(AppError::CannotRevokeRole(reason.to_owned())),
        }
    }

    /// Revokes the worker role on a service.
    pub async fn revoke_service_worker(
        &self,
        user_id: UserId,
        service_id: ServiceId,
    ) -> AppResult<()> {
        self.revoke(user_id, Role::ServiceWorker, RoleScope::service(service_id))
            .await
    }

    /// Revokes the admin role on a service.
    pub async fn revoke_service_admin(
        &self,
        user_id: UserId,
        service_id: ServiceId,
    ) -> AppResult<()> {
        self.revoke(user_id, Role::ServiceAdmin, RoleScope::service(service_id))
            .await
    }

    /// Revokes the admin role on an organisation.
    pub async fn revoke_organisation_admin(
        &self,
        user_id: UserId,
        organisation_id: OrganisationId,
    ) -> AppResult<()> {
        self.revoke(
            user_id,
            Role::OrganisationAdmin,
            RoleScope::organisation(organisation_id),
        )
        .await
    }

    /// Revokes the content admin role.
    pub async fn revoke_content_admin(&self, user_id: UserId) -> AppResult<()> {
        self.revoke(user_id, Role::ContentAdmin, RoleScope::Global).await
    }

    /// Revokes the global admin role.
    pub async fn revoke_global_admin(&self, user_id: UserId) -> AppResult<()> {
        self.revoke(user_id, Role::GlobalAdmin, RoleScope::Global).await
    }

    /// Revokes the super admin role. Top of the hierarchy; unguarded.
    pub async fn revoke_super_admin(&self, user_id: UserId) -> AppResult<()> {
        self.revoke(user_id, Role::SuperAdmin, RoleScope::Global).await
    }

    /// Returns the guard blocking a revoke of `role` at `scope`, with the
    /// reason reported when the guard fires.
    async fn revoke_guard(
        &self,
        role: Role,
        scope: RoleScope,
    ) -> AppResult<(Option<RevokeGuard>, &'static str)> {
        let guarded = match role {
            Role::ServiceWorker => (
                Some(RevokeGuard {
                    role: Role::ServiceAdmin,
                    scope: Some(scope),
                }),
                "Cannot revoke service worker role when user is a service admin",
            ),
            Role::ServiceAdmin => {
                let service_id = scope.service_id().ok_or_else(|| {
                    AppError::InvalidScope("service admin revoke requires a service".to_owned())
                })?;
                let organisation_id = self.hierarchy.organisation_of(service_id).await?;
                (
                    Some(RevokeGuard {
                        role: Role::OrganisationAdmin,
                        scope: Some(RoleScope::organisation(organisation_id)),
                    }),
                    "Cannot revoke service admin role when user is an organisation admin",
                )
            }
            Role::OrganisationAdmin => (
                Some(RevokeGuard {
                    role: Role::GlobalAdmin,
                    scope: Some(RoleScope::Global),
                }),
                "Cannot revoke organisation admin role when user is an global admin",
            ),
            Role::ContentAdmin => (
                Some(RevokeGuard {
                    role: Role::SuperAdmin,
                    scope: Some(RoleScope::Global),
                }),
                "Cannot revoke content admin role when user is an super admin",
            ),
            Role::GlobalAdmin => (
                Some(RevokeGuard {
                    role: Role::SuperAdmin,
                    scope: Some(RoleScope::Global),
                }),
                "Cannot revoke global admin role when user is an super admin",
            ),
            Role::SuperAdmin => (None, ""),
        };

        Ok(guarded)
    }
}
