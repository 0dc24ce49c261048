use std::collections::BTreeSet;

use civika_core::AppResult;
use civika_domain::{Role, ServiceId, UserId};

use super::PermissionService;

impl PermissionService {
    /// Returns the ids of every user the invoker may see.
    ///
    /// Super admins see everyone; global admins see only themselves.
    /// Everyone else sees the members of the services they reach as an
    /// organisation admin or a service admin, rank-shielded: users who also
    /// hold a higher role anywhere are excluded even when they share a
    /// service with the invoker. The invoker always sees themself.
    pub async fn visible_user_ids(&self, invoker: UserId) -> AppResult<BTreeSet<UserId>> {
        let invoker_set = self.role_set(invoker).await?;

        if invoker_set.is_super_admin() {
            let mut visible: BTreeSet<UserId> =
                self.assignments.all_user_ids().await?.into_iter().collect();
            visible.insert(invoker);
            return Ok(visible);
        }

        if invoker_set.is_global_admin() {
            return Ok(BTreeSet::from([invoker]));
        }

        let mut administered_services: Vec<ServiceId> = Vec::new();
        for organisation_id in invoker_set.organisation_admin_scopes() {
            administered_services.extend(self.hierarchy.services_under(organisation_id).await?);
        }

        let mut visible: BTreeSet<UserId> = self
            .assignments
            .user_ids_for_services(
                &administered_services,
                &[Role::GlobalAdmin, Role::SuperAdmin],
            )
            .await?
            .into_iter()
            .collect();

        let direct_admin_services = invoker_set.service_admin_scopes();
        visible.extend(
            self.assignments
                .user_ids_for_services(
                    &direct_admin_services,
                    &[Role::OrganisationAdmin, Role::GlobalAdmin, Role::SuperAdmin],
                )
                .await?,
        );

        visible.insert(invoker);
        Ok(visible)
    }
}
