use async_trait::async_trait;
use tokio::sync::RwLock;

use civika_application::{RevokeGuard, RevokeOutcome, RoleAssignmentRepository};
use civika_core::AppResult;
use civika_domain::{Role, RoleAssignment, RoleScope, ServiceId, UserId};

/// In-memory assignment store for tests and local development.
///
/// A single lock over the whole row set stands in for the transactional
/// guarantees the Postgres adapter gets from the database: each operation
/// takes the lock once, so guard checks and deletes observe one state.
#[derive(Debug, Default)]
pub struct InMemoryRoleAssignmentRepository {
    rows: RwLock<Vec<RoleAssignment>>,
}

impl InMemoryRoleAssignmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Returns the total number of stored assignments.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns whether the store holds no assignments.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

fn matches_scope(assignment: &RoleAssignment, scope: Option<RoleScope>) -> bool {
    scope.is_none_or(|expected| assignment.scope() == expected)
}

#[async_trait]
impl RoleAssignmentRepository for InMemoryRoleAssignmentRepository {
    async fn insert_all(&self, assignments: Vec<RoleAssignment>) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        for assignment in assignments {
            if !rows.contains(&assignment) {
                rows.push(assignment);
            }
        }
        Ok(())
    }

    async fn exists(
        &self,
        user_id: UserId,
        role: Role,
        scope: Option<RoleScope>,
    ) -> AppResult<bool> {
        let rows = self.rows.read().await;
        Ok(rows.iter().any(|row| {
            row.user_id() == user_id && row.role() == role && matches_scope(row, scope)
        }))
    }

    async fn remove_guarded(
        &self,
        user_id: UserId,
        role: Role,
        scope: RoleScope,
        guard: Option<RevokeGuard>,
    ) -> AppResult<RevokeOutcome> {
        let mut rows = self.rows.write().await;

        if let Some(guard) = guard {
            let blocked = rows.iter().any(|row| {
                row.user_id() == user_id
                    && row.role() == guard.role
                    && matches_scope(row, guard.scope)
            });
            if blocked {
                tracing::debug!(%user_id, role = role.as_str(), "revoke blocked by guard");
                return Ok(RevokeOutcome::Blocked);
            }
        }

        rows.retain(|row| {
            !(row.user_id() == user_id && row.role() == role && row.scope() == scope)
        });
        Ok(RevokeOutcome::Removed)
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| row.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn all_user_ids(&self) -> AppResult<Vec<UserId>> {
        let rows = self.rows.read().await;
        let mut ids: Vec<UserId> = rows.iter().map(RoleAssignment::user_id).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn user_ids_for_scope(
        &self,
        scope: RoleScope,
        role: Option<Role>,
    ) -> AppResult<Vec<UserId>> {
        let rows = self.rows.read().await;
        let mut ids: Vec<UserId> = rows
            .iter()
            .filter(|row| {
                row.scope() == scope && role.is_none_or(|expected| row.role() == expected)
            })
            .map(RoleAssignment::user_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn user_ids_for_services(
        &self,
        service_ids: &[ServiceId],
        excluded_roles: &[Role],
    ) -> AppResult<Vec<UserId>> {
        let rows = self.rows.read().await;
        let mut ids: Vec<UserId> = rows
            .iter()
            .filter(|row| {
                row.scope()
                    .service_id()
                    .is_some_and(|service_id| service_ids.contains(&service_id))
            })
            .map(RoleAssignment::user_id)
            .filter(|user_id| {
                !rows.iter().any(|row| {
                    row.user_id() == *user_id && excluded_roles.contains(&row.role())
                })
            })
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}
