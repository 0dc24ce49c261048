use civika_core::{AppError, AppResult};
use civika_domain::{
    OrganisationId, Role, RoleScope, RoleSet, ServiceId, UserId, can_revoke_role, can_update,
};

use super::PermissionService;

impl PermissionService {
    /// Returns whether the user holds the role at the given scope.
    ///
    /// At most one of `service` and `organisation` may be supplied;
    /// supplying neither means "holds the role at any scope". This variant
    /// queries storage directly; use [`PermissionService::role_set`] when a
    /// decision needs several checks against one consistent snapshot.
    pub async fn has_role(
        &self,
        user_id: UserId,
        role: Role,
        service: Option<ServiceId>,
        organisation: Option<OrganisationId>,
    ) -> AppResult<bool> {
        let scope = scope_filter(service, organisation)?;
        self.assignments.exists(user_id, role, scope).await
    }

    /// Loads the user's assignments once, as a queryable snapshot.
    ///
    /// The snapshot can be stale relative to concurrent writes; callers
    /// trade that for avoiding repeated storage round-trips within one
    /// authorization decision.
    pub async fn role_set(&self, user_id: UserId) -> AppResult<RoleSet> {
        let assignments = self.assignments.list_for_user(user_id).await?;
        Ok(RoleSet::new(user_id, assignments))
    }

    /// Returns whether the user is a super admin.
    pub async fn is_super_admin(&self, user_id: UserId) -> AppResult<bool> {
        self.assignments
            .exists(user_id, Role::SuperAdmin, None)
            .await
    }

    /// Returns whether the user is a global admin, directly or as super
    /// admin.
    pub async fn is_global_admin(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.assignments.exists(user_id, Role::GlobalAdmin, None).await?
            || self.is_super_admin(user_id).await?)
    }

    /// Returns whether the user is a content admin, directly or as super
    /// admin.
    pub async fn is_content_admin(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.assignments.exists(user_id, Role::ContentAdmin, None).await?
            || self.is_super_admin(user_id).await?)
    }

    /// Returns whether the user administers the organisation, or any
    /// organisation when `None` is passed.
    pub async fn is_organisation_admin(
        &self,
        user_id: UserId,
        organisation: Option<OrganisationId>,
    ) -> AppResult<bool> {
        Ok(self
            .assignments
            .exists(
                user_id,
                Role::OrganisationAdmin,
                organisation.map(RoleScope::organisation),
            )
            .await?
            || self.is_super_admin(user_id).await?)
    }

    /// Returns whether the user administers the service, or any service
    /// when `None` is passed. Resolves the owning organisation for the
    /// implication from organisation admin.
    pub async fn is_service_admin(
        &self,
        user_id: UserId,
        service: Option<ServiceId>,
    ) -> AppResult<bool> {
        let directly = self
            .assignments
            .exists(user_id, Role::ServiceAdmin, service.map(RoleScope::service))
            .await?;
        if directly {
            return Ok(true);
        }

        let owning = match service {
            Some(service_id) => Some(self.hierarchy.organisation_of(service_id).await?),
            None => None,
        };
        self.is_organisation_admin(user_id, owning).await
    }

    /// Returns whether the user works on the service, directly or via the
    /// service-admin implication.
    pub async fn is_service_worker(
        &self,
        user_id: UserId,
        service: Option<ServiceId>,
    ) -> AppResult<bool> {
        Ok(self
            .assignments
            .exists(user_id, Role::ServiceWorker, service.map(RoleScope::service))
            .await?
            || self.is_service_admin(user_id, service).await?)
    }

    /// Returns whether the invoker may update the subject's account.
    pub async fn can_update(&self, invoker: UserId, subject: UserId) -> AppResult<bool> {
        if invoker == subject {
            return Ok(true);
        }

        let invoker_set = self.role_set(invoker).await?;
        let subject_set = self.role_set(subject).await?;
        Ok(can_update(&invoker_set, &subject_set))
    }

    /// Returns whether the invoker may delete the subject's account. Same
    /// rule as [`PermissionService::can_update`].
    pub async fn can_delete(&self, invoker: UserId, subject: UserId) -> AppResult<bool> {
        self.can_update(invoker, subject).await
    }

    /// Returns whether the invoker may view the subject's record.
    pub async fn can_view(&self, invoker: UserId, subject: UserId) -> AppResult<bool> {
        Ok(self.visible_user_ids(invoker).await?.contains(&subject))
    }

    /// Returns whether the invoker may revoke roles held by the subject in
    /// the given organisation/service context.
    pub async fn can_revoke_role(
        &self,
        invoker: UserId,
        subject: UserId,
        organisation: Option<OrganisationId>,
        service: Option<ServiceId>,
    ) -> AppResult<bool> {
        let invoker_set = self.role_set(invoker).await?;
        let subject_set = self.role_set(subject).await?;
        Ok(can_revoke_role(
            &invoker_set,
            &subject_set,
            organisation,
            service,
        ))
    }

    /// Returns whether the invoker may revoke the subject's worker role on
    /// the service.
    pub async fn can_revoke_service_worker(
        &self,
        invoker: UserId,
        subject: UserId,
        service_id: ServiceId,
    ) -> AppResult<bool> {
        let organisation_id = self.hierarchy.organisation_of(service_id).await?;
        self.can_revoke_role(invoker, subject, Some(organisation_id), Some(service_id))
            .await
    }

    /// Returns whether the invoker may revoke the subject's admin role on
    /// the service.
    pub async fn can_revoke_service_admin(
        &self,
        invoker: UserId,
        subject: UserId,
        service_id: ServiceId,
    ) -> AppResult<bool> {
        let organisation_id = self.hierarchy.organisation_of(service_id).await?;
        self.can_revoke_role(invoker, subject, Some(organisation_id), Some(service_id))
            .await
    }

    /// Returns whether the invoker may revoke the subject's admin role on
    /// the organisation.
    pub async fn can_revoke_organisation_admin(
        &self,
        invoker: UserId,
        subject: UserId,
        organisation_id: OrganisationId,
    ) -> AppResult<bool> {
        self.can_revoke_role(invoker, subject, Some(organisation_id), None)
            .await
    }

    /// Returns whether the invoker may revoke the subject's content admin
    /// role.
    pub async fn can_revoke_content_admin(
        &self,
        invoker: UserId,
        subject: UserId,
    ) -> AppResult<bool> {
        self.can_revoke_role(invoker, subject, None, None).await
    }

    /// Returns whether the invoker may revoke the subject's global admin
    /// role.
    pub async fn can_revoke_global_admin(
        &self,
        invoker: UserId,
        subject: UserId,
    ) -> AppResult<bool> {
        self.can_revoke_role(invoker, subject, None, None).await
    }

    /// Returns whether the invoker may revoke the subject's super admin
    /// role.
    pub async fn can_revoke_super_admin(
        &self,
        invoker: UserId,
        subject: UserId,
    ) -> AppResult<bool> {
        self.can_revoke_role(invoker, subject, None, None).await
    }

    /// Returns whether the invoker may grant the worker role on the
    /// service. Global-admin-only invokers manage users elsewhere.
    pub async fn can_make_service_worker(
        &self,
        invoker: UserId,
        service_id: ServiceId,
    ) -> AppResult<bool> {
        Ok(self.is_service_worker(invoker, Some(service_id)).await?
            && !self.is_global_admin_only(invoker).await?)
    }

    /// Returns whether the invoker may grant the admin role on the service.
    pub async fn can_make_service_admin(
        &self,
        invoker: UserId,
        service_id: ServiceId,
    ) -> AppResult<bool> {
        Ok(self.is_service_admin(invoker, Some(service_id)).await?
            && !self.is_global_admin_only(invoker).await?)
    }

    /// Returns whether the invoker may grant the admin role on the
    /// organisation.
    pub async fn can_make_organisation_admin(
        &self,
        invoker: UserId,
        organisation_id: OrganisationId,
    ) -> AppResult<bool> {
        Ok(self
            .is_organisation_admin(invoker, Some(organisation_id))
            .await?
            && !self.is_global_admin_only(invoker).await?)
    }

    /// Returns whether the invoker may grant the content admin role.
    pub async fn can_make_content_admin(&self, invoker: UserId) -> AppResult<bool> {
        self.is_super_admin(invoker).await
    }

    /// Returns whether the invoker may grant the global admin role.
    pub async fn can_make_global_admin(&self, invoker: UserId) -> AppResult<bool> {
        self.is_super_admin(invoker).await
    }

    /// Returns whether the invoker may grant the super admin role.
    pub async fn can_make_super_admin(&self, invoker: UserId) -> AppResult<bool> {
        self.is_super_admin(invoker).await
    }

    /// Returns the single highest-ranked role the user directly holds.
    pub async fn highest_role(&self, user_id: UserId) -> AppResult<Option<Role>> {
        Ok(self.role_set(user_id).await?.highest_role())
    }

    async fn is_global_admin_only(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.is_global_admin(user_id).await? && !self.is_super_admin(user_id).await?)
    }
}

fn scope_filter(
    service: Option<ServiceId>,
    organisation: Option<OrganisationId>,
) -> AppResult<Option<RoleScope>> {
    match (service, organisation) {
        (Some(_), Some(_)) => Err(AppError::InvalidScope(
            "a role cannot be scoped to both a service and an organisation".to_owned(),
        )),
        (Some(service_id), None) => Ok(Some(RoleScope::service(service_id))),
        (None, Some(organisation_id)) => Ok(Some(RoleScope::organisation(organisation_id))),
        (None, None) => Ok(None),
    }
}
