use std::collections::HashSet;

use civika_core::{AppError, AppResult};
use civika_domain::{OrganisationId, Role, RoleAssignment, RoleScope, ServiceId, UserId};

use super::PermissionService;

impl PermissionService {
    /// Grants a role to a user, materialising every assignment the role
    /// implies.
    ///
    /// The whole cascade is computed up front and written as one atomic
    /// batch, so a reader never observes a partially-cascaded state.
    /// Re-granting an already-held role is a no-op.
    pub async fn grant(&self, user_id: UserId, role: Role, scope: RoleScope) -> AppResult<()> {
        if role.category() != scope.category() {
            return Err(AppError::InvalidScope(format!(
                "role '{}' cannot be granted at scope '{scope}'",
                role.as_str()
            )));
        }

        let rows = self.cascade_assignments(user_id, role, scope).await?;
        self.assignments.insert_all(rows).await
    }

    /// Makes the user a worker of the service.
    pub async fn make_service_worker(
        &self,
        user_id: UserId,
        service_id: ServiceId,
    ) -> AppResult<()> {
        self.grant(user_id, Role::ServiceWorker, RoleScope::service(service_id))
            .await
    }

    /// Makes the user an admin of the service, cascading the worker role.
    pub async fn make_service_admin(
        &self,
        user_id: UserId,
        service_id: ServiceId,
    ) -> AppResult<()> {
        self.grant(user_id, Role::ServiceAdmin, RoleScope::service(service_id))
            .await
    }

    /// Makes the user an admin of the organisation, cascading admin and
    /// worker roles for every service currently under it.
    pub async fn make_organisation_admin(
        &self,
        user_id: UserId,
        organisation_id: OrganisationId,
    ) -> AppResult<()> {
        self.grant(
            user_id,
            Role::OrganisationAdmin,
            RoleScope::organisation(organisation_id),
        )
        .await
    }

    /// Makes the user a content admin. No cascade target.
    pub async fn make_content_admin(&self, user_id: UserId) -> AppResult<()> {
        self.grant(user_id, Role::ContentAdmin, RoleScope::Global).await
    }

    /// Makes the user a global admin, cascading organisation admin across
    /// every organisation in the directory.
    pub async fn make_global_admin(&self, user_id: UserId) -> AppResult<()> {
        self.grant(user_id, Role::GlobalAdmin, RoleScope::Global).await
    }

    /// Makes the user a super admin, cascading every other role.
    pub async fn make_super_admin(&self, user_id: UserId) -> AppResult<()> {
        self.grant(user_id, Role::SuperAdmin, RoleScope::Global).await
    }

    /// Expands a grant into the full ordered list of assignment rows it
    /// implies. The organisation-to-service fan-out is iterative; the
    /// hierarchy is a tree, so a bounded pair of loops covers it.
    async fn cascade_assignments(
        &self,
        user_id: UserId,
        role: Role,
        scope: RoleScope,
    ) -> AppResult<Vec<RoleAssignment>> {
        let mut cascade = Cascade::new(user_id);

        match (role, scope) {
            (Role::ServiceWorker, RoleScope::Service { id }) => {
                cascade.service_worker(id)?;
            }
            (Role::ServiceAdmin, RoleScope::Service { id }) => {
                cascade.service_admin(id)?;
            }
            (Role::OrganisationAdmin, RoleScope::Organisation { id }) => {
                self.organisation_cascade(&mut cascade, id).await?;
            }
            (Role::ContentAdmin, RoleScope::Global) => {
                cascade.global_role(Role::ContentAdmin)?;
            }
            (Role::GlobalAdmin, RoleScope::Global) => {
                for organisation_id in self.hierarchy.organisation_ids().await? {
                    self.organisation_cascade(&mut cascade, organisation_id)
                        .await?;
                }
                cascade.global_role(Role::GlobalAdmin)?;
            }
            (Role::SuperAdmin, RoleScope::Global) => {
                for organisation_id in self.hierarchy.organisation_ids().await? {
                    self.organisation_cascade(&mut cascade, organisation_id)
                        .await?;
                }
                cascade.global_role(Role::ContentAdmin)?;
                cascade.global_role(Role::GlobalAdmin)?;
                cascade.global_role(Role::SuperAdmin)?;
            }
            (role, scope) => {
                return Err(AppError::InvalidScope(format!(
                    "role '{}' cannot be granted at scope '{scope}'",
                    role.as_str()
                )));
            }
        }

        Ok(cascade.into_rows())
    }

    async fn organisation_cascade(
        &self,
        cascade: &mut Cascade,
        organisation_id: OrganisationId,
    ) -> AppResult<()> {
        for service_id in self.hierarchy.services_under(organisation_id).await? {
            cascade.service_admin(service_id)?;
        }

        cascade.organisation_admin(organisation_id)
    }
}

/// Ordered, deduplicated accumulator for one grant's assignment rows.
struct Cascade {
    user_id: UserId,
    rows: Vec<RoleAssignment>,
    seen: HashSet<RoleAssignment>,
}

impl Cascade {
    fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            rows: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, role: Role, scope: RoleScope) -> AppResult<()> {
        let assignment = RoleAssignment::new(self.user_id, role, scope)?;
        if self.seen.insert(assignment.clone()) {
            self.rows.push(assignment);
        }
        Ok(())
    }

    fn service_worker(&mut self, service_id: ServiceId) -> AppResult<()> {
        self.push(Role::ServiceWorker, RoleScope::service(service_id))
    }

    fn service_admin(&mut self, service_id: ServiceId) -> AppResult<()> {
        self.service_worker(service_id)?;
        self.push(Role::ServiceAdmin, RoleScope::service(service_id))
    }

    fn organisation_admin(&mut self, organisation_id: OrganisationId) -> AppResult<()> {
        self.push(
            Role::OrganisationAdmin,
            RoleScope::organisation(organisation_id),
        )
    }

    fn global_role(&mut self, role: Role) -> AppResult<()> {
        self.push(role, RoleScope::Global)
    }

    fn into_rows(self) -> Vec<RoleAssignment> {
        self.rows
    }
}
