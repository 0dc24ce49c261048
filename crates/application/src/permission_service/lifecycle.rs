use civika_core::{AppError, AppResult};
use civika_domain::{OrganisationId, Role, RoleScope, ServiceId, UserId};

use super::PermissionService;

impl PermissionService {
    /// Reacts to a service being created under an organisation: every
    /// current admin of the organisation becomes admin (and worker) of the
    /// new service.
    pub async fn service_created(
        &self,
        service_id: ServiceId,
        organisation_id: OrganisationId,
    ) -> AppResult<()> {
        let admins = self
            .assignments
            .user_ids_for_scope(
                RoleScope::organisation(organisation_id),
                Some(Role::OrganisationAdmin),
            )
            .await?;

        for user_id in admins {
            self.make_service_admin(user_id, service_id).await?;
        }

        Ok(())
    }

    /// Reacts to a service moving to a different organisation.
    ///
    /// Existing service-scoped roles are revoked best-effort: a revoke
    /// blocked by its guard is logged and skipped, since an admin of the new
    /// organisation legitimately keeps the role. The new organisation's
    /// admins are then granted service admin and worker roles. The
    /// hierarchy must already reflect the new owning organisation.
    pub async fn service_reassigned(&self, service_id: ServiceId) -> AppResult<()> {
        let holders = self
            .assignments
            .user_ids_for_scope(RoleScope::service(service_id), None)
            .await?;

        for user_id in holders {
            self.revoke_best_effort(user_id, Role::ServiceAdmin, service_id)
                .await?;
            self.revoke_best_effort(user_id, Role::ServiceWorker, service_id)
                .await?;
        }

        let organisation_id = self.hierarchy.organisation_of(service_id).await?;
        self.service_created(service_id, organisation_id).await
    }

    async fn revoke_best_effort(
        &self,
        user_id: UserId,
        role: Role,
        service_id: ServiceId,
    ) -> AppResult<()> {
        match self
            .revoke(user_id, role, RoleScope::service(service_id))
            .await
        {
            Err(AppError::CannotRevokeRole(reason)) => {
                tracing::warn!(
                    %user_id,
                    %service_id,
                    role = role.as_str(),
                    reason,
                    "kept role during service reassignment"
                );
                Ok(())
            }
            other => other,
        }
    }
}
