use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use civika_application::{RevokeGuard, RevokeOutcome, RoleAssignmentRepository};
use civika_core::{AppError, AppResult};
use civika_domain::{OrganisationId, Role, RoleAssignment, RoleScope, ServiceId, UserId};

/// PostgreSQL-backed store for `(user, role, scope)` assignment rows.
///
/// Uniqueness of the triple is enforced by the `user_roles_unique_triple`
/// constraint; scope exclusivity by `user_roles_scope_matches_role`.
#[derive(Clone)]
pub struct PostgresRoleAssignmentRepository {
    pool: PgPool,
}

impl PostgresRoleAssignmentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AssignmentRow {
    user_id: uuid::Uuid,
    role_name: String,
    organisation_id: Option<uuid::Uuid>,
    service_id: Option<uuid::Uuid>,
}

impl AssignmentRow {
    fn into_assignment(self) -> AppResult<RoleAssignment> {
        let role = Role::from_str(self.role_name.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "invalid stored role '{}' for user '{}': {error}",
                self.role_name, self.user_id
            ))
        })?;

        let scope = match (self.organisation_id, self.service_id) {
            (None, None) => RoleScope::Global,
            (Some(id), None) => RoleScope::organisation(OrganisationId::from_uuid(id)),
            (None, Some(id)) => RoleScope::service(ServiceId::from_uuid(id)),
            (Some(_), Some(_)) => {
                return Err(AppError::Internal(format!(
                    "assignment row for user '{}' carries both scope columns",
                    self.user_id
                )));
            }
        };

        RoleAssignment::new(UserId::from_uuid(self.user_id), role, scope).map_err(|error| {
            AppError::Internal(format!(
                "assignment row for user '{}' violates scope exclusivity: {error}",
                self.user_id
            ))
        })
    }
}

fn scope_columns(scope: RoleScope) -> (Option<uuid::Uuid>, Option<uuid::Uuid>) {
    (
        scope.organisation_id().map(|id| id.as_uuid()),
        scope.service_id().map(|id| id.as_uuid()),
    )
}

async fn role_held<'a, E>(
    executor: E,
    user_id: UserId,
    role: Role,
    scope: Option<RoleScope>,
) -> AppResult<bool>
where
    E: sqlx::Executor<'a, Database = sqlx::Postgres>,
{
    let query = match scope {
        Some(scope) => {
            let (organisation_id, service_id) = scope_columns(scope);
            sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS (
                    SELECT 1
                    FROM user_roles
                    WHERE user_id = $1
                        AND role_name = $2
                        AND organisation_id IS NOT DISTINCT FROM $3
                        AND service_id IS NOT DISTINCT FROM $4
                )
                "#,
            )
            .bind(user_id.as_uuid())
            .bind(role.as_str())
            .bind(organisation_id)
            .bind(service_id)
        }
        None => sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles
                WHERE user_id = $1
                    AND role_name = $2
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role.as_str()),
    };

    query
        .fetch_one(executor)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role membership: {error}")))
}

#[async_trait]
impl RoleAssignmentRepository for PostgresRoleAssignmentRepository {
    async fn insert_all(&self, assignments: Vec<RoleAssignment>) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        for assignment in &assignments {
            let (organisation_id, service_id) = scope_columns(assignment.scope());
            sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role_name, organisation_id, service_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT ON CONSTRAINT user_roles_unique_triple DO NOTHING
                "#,
            )
            .bind(assignment.user_id().as_uuid())
            .bind(assignment.role().as_str())
            .bind(organisation_id)
            .bind(service_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist role assignment: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    async fn exists(
        &self,
        user_id: UserId,
        role: Role,
        scope: Option<RoleScope>,
    ) -> AppResult<bool> {
        role_held(&self.pool, user_id, role, scope).await
    }

    async fn remove_guarded(
        &self,
        user_id: UserId,
        role: Role,
        scope: RoleScope,
        guard: Option<RevokeGuard>,
    ) -> AppResult<RevokeOutcome> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        if let Some(guard) = guard
            && role_held(&mut *transaction, user_id, guard.role, guard.scope).await?
        {
            return Ok(RevokeOutcome::Blocked);
        }

        let (organisation_id, service_id) = scope_columns(scope);
        sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1
                AND role_name = $2
                AND organisation_id IS NOT DISTINCT FROM $3
                AND service_id IS NOT DISTINCT FROM $4
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role.as_str())
        .bind(organisation_id)
        .bind(service_id)
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to remove role assignment: {error}"))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(RevokeOutcome::Removed)
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT user_id, role_name, organisation_id, service_id
            FROM user_roles
            WHERE user_id = $1
            ORDER BY role_name, organisation_id, service_id
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list assignments: {error}")))?;

        rows.into_iter().map(AssignmentRow::into_assignment).collect()
    }

    async fn all_user_ids(&self) -> AppResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT DISTINCT user_id
            FROM user_roles
            ORDER BY user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn user_ids_for_scope(
        &self,
        scope: RoleScope,
        role: Option<Role>,
    ) -> AppResult<Vec<UserId>> {
        let (organisation_id, service_id) = scope_columns(scope);
        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT DISTINCT user_id
            FROM user_roles
            WHERE organisation_id IS NOT DISTINCT FROM $1
                AND service_id IS NOT DISTINCT FROM $2
                AND ($3::text IS NULL OR role_name = $3)
            ORDER BY user_id
            "#,
        )
        .bind(organisation_id)
        .bind(service_id)
        .bind(role.map(|role| role.as_str().to_owned()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list scope holders: {error}")))?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn user_ids_for_services(
        &self,
        service_ids: &[ServiceId],
        excluded_roles: &[Role],
    ) -> AppResult<Vec<UserId>> {
        let service_ids = service_ids
            .iter()
            .map(|id| id.as_uuid())
            .collect::<Vec<_>>();
        let excluded_roles = excluded_roles
            .iter()
            .map(|role| role.as_str().to_owned())
            .collect::<Vec<_>>();

        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT DISTINCT roles.user_id
            FROM user_roles AS roles
            WHERE roles.service_id = ANY($1)
                AND NOT EXISTS (
                    SELECT 1
                    FROM user_roles AS excluded
                    WHERE excluded.user_id = roles.user_id
                        AND excluded.role_name = ANY($2)
                )
            ORDER BY roles.user_id
            "#,
        )
        .bind(service_ids)
        .bind(excluded_roles)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list service members: {error}")))?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }
}
