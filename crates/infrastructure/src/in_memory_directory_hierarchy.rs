use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use civika_application::DirectoryHierarchy;
use civika_core::{AppError, AppResult};
use civika_domain::{OrganisationId, ServiceId};

/// In-memory containment hierarchy for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryHierarchy {
    organisations: RwLock<Vec<OrganisationId>>,
    owners: RwLock<HashMap<ServiceId, OrganisationId>>,
}

impl InMemoryDirectoryHierarchy {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            organisations: RwLock::new(Vec::new()),
            owners: RwLock::new(HashMap::new()),
        }
    }

    /// Registers an organisation.
    pub async fn add_organisation(&self, organisation_id: OrganisationId) {
        let mut organisations = self.organisations.write().await;
        if !organisations.contains(&organisation_id) {
            organisations.push(organisation_id);
        }
    }

    /// Registers a service under an organisation, moving it if it already
    /// exists elsewhere.
    pub async fn put_service(&self, service_id: ServiceId, organisation_id: OrganisationId) {
        self.owners.write().await.insert(service_id, organisation_id);
    }

    /// Removes a service from the hierarchy.
    pub async fn remove_service(&self, service_id: ServiceId) {
        self.owners.write().await.remove(&service_id);
    }
}

#[async_trait]
impl DirectoryHierarchy for InMemoryDirectoryHierarchy {
    async fn services_under(&self, organisation_id: OrganisationId) -> AppResult<Vec<ServiceId>> {
        let owners = self.owners.read().await;
        let mut services: Vec<ServiceId> = owners
            .iter()
            .filter_map(|(service_id, owner)| (*owner == organisation_id).then_some(*service_id))
            .collect();
        services.sort();
        Ok(services)
    }

    async fn organisation_of(&self, service_id: ServiceId) -> AppResult<OrganisationId> {
        self.owners
            .read()
            .await
            .get(&service_id)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("service '{service_id}' was not found")))
    }

    async fn organisation_ids(&self) -> AppResult<Vec<OrganisationId>> {
        Ok(self.organisations.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use civika_application::DirectoryHierarchy;
    use civika_domain::{OrganisationId, ServiceId};

    use super::InMemoryDirectoryHierarchy;

    #[tokio::test]
    async fn services_follow_their_owner() {
        let hierarchy = InMemoryDirectoryHierarchy::new();
        let first = OrganisationId::new();
        let second = OrganisationId::new();
        let service_id = ServiceId::new();
        hierarchy.add_organisation(first).await;
        hierarchy.add_organisation(second).await;
        hierarchy.put_service(service_id, first).await;

        assert_eq!(hierarchy.services_under(first).await.ok(), Some(vec![service_id]));
        assert_eq!(hierarchy.organisation_of(service_id).await.ok(), Some(first));

        hierarchy.put_service(service_id, second).await;
        assert_eq!(hierarchy.services_under(first).await.ok(), Some(Vec::new()));
        assert_eq!(hierarchy.organisation_of(service_id).await.ok(), Some(second));
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let hierarchy = InMemoryDirectoryHierarchy::new();
        assert!(hierarchy.organisation_of(ServiceId::new()).await.is_err());
    }
}
