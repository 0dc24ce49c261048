use async_trait::async_trait;
use sqlx::PgPool;

use civika_application::DirectoryHierarchy;
use civika_core::{AppError, AppResult};
use civika_domain::{OrganisationId, ServiceId};

/// PostgreSQL-backed view of the directory's containment hierarchy.
#[derive(Clone)]
pub struct PostgresDirectoryHierarchy {
    pool: PgPool,
}

impl PostgresDirectoryHierarchy {
    /// Creates a hierarchy view with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryHierarchy for PostgresDirectoryHierarchy {
    async fn services_under(&self, organisation_id: OrganisationId) -> AppResult<Vec<ServiceId>> {
        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT id
            FROM services
            WHERE organisation_id = $1
            ORDER BY id
            "#,
        )
        .bind(organisation_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list services: {error}")))?;

        Ok(ids.into_iter().map(ServiceId::from_uuid).collect())
    }

    async fn organisation_of(&self, service_id: ServiceId) -> AppResult<OrganisationId> {
        let owner = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT organisation_id
            FROM services
            WHERE id = $1
            "#,
        )
        .bind(service_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve service owner: {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("service '{service_id}' was not found")))?;

        Ok(OrganisationId::from_uuid(owner))
    }

    async fn organisation_ids(&self) -> AppResult<Vec<OrganisationId>> {
        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT id
            FROM organisations
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list organisations: {error}")))?;

        Ok(ids.into_iter().map(OrganisationId::from_uuid).collect())
    }
}
