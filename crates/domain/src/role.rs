use std::str::FromStr;

use civika_core::AppError;
use serde::{Deserialize, Serialize};

/// Closed catalog of roles recognised by the permission model.
///
/// The catalog is fixed at compile time; there is no database-backed role
/// table to mutate. Precedence between roles is expressed through
/// [`Role::precedence`] and the implication chain on
/// [`crate::RoleSet`], not through a stored rank column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Top of the hierarchy; implies every other role.
    SuperAdmin,
    /// Administers every organisation. Sibling of `ContentAdmin`.
    GlobalAdmin,
    /// Administers editorial content. Sibling of `GlobalAdmin`.
    ContentAdmin,
    /// Administers one organisation and every service under it.
    OrganisationAdmin,
    /// Administers one service.
    ServiceAdmin,
    /// Works on one service.
    ServiceWorker,
}

/// Scope category a role must be assigned at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleCategory {
    /// Assigned without a scoping resource.
    Global,
    /// Assigned against one organisation.
    OrganisationScoped,
    /// Assigned against one service.
    ServiceScoped,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::GlobalAdmin => "global_admin",
            Self::ContentAdmin => "content_admin",
            Self::OrganisationAdmin => "organisation_admin",
            Self::ServiceAdmin => "service_admin",
            Self::ServiceWorker => "service_worker",
        }
    }

    /// Returns the scope category assignments of this role must carry.
    #[must_use]
    pub fn category(&self) -> RoleCategory {
        match self {
            Self::SuperAdmin | Self::GlobalAdmin | Self::ContentAdmin => RoleCategory::Global,
            Self::OrganisationAdmin => RoleCategory::OrganisationScoped,
            Self::ServiceAdmin | Self::ServiceWorker => RoleCategory::ServiceScoped,
        }
    }

    /// Returns the position of this role in the catalog order, `0` being the
    /// highest. `GlobalAdmin` and `ContentAdmin` are incomparable siblings;
    /// their adjacent positions only break ties when a single highest role
    /// must be reported.
    #[must_use]
    pub fn precedence(&self) -> u8 {
        match self {
            Self::SuperAdmin => 0,
            Self::GlobalAdmin => 1,
            Self::ContentAdmin => 2,
            Self::OrganisationAdmin => 3,
            Self::ServiceAdmin => 4,
            Self::ServiceWorker => 5,
        }
    }

    /// Returns all known roles in catalog order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::SuperAdmin,
            Role::GlobalAdmin,
            Role::ContentAdmin,
            Role::OrganisationAdmin,
            Role::ServiceAdmin,
            Role::ServiceWorker,
        ];

        ALL
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "super_admin" => Ok(Self::SuperAdmin),
            "global_admin" => Ok(Self::GlobalAdmin),
            "content_admin" => Ok(Self::ContentAdmin),
            "organisation_admin" => Ok(Self::OrganisationAdmin),
            "service_admin" => Ok(Self::ServiceAdmin),
            "service_worker" => Ok(Self::ServiceWorker),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Returns the highest-ranked role in the given collection of directly-held
/// roles, or `None` when the collection is empty.
#[must_use]
pub fn highest_role(roles: impl IntoIterator<Item = Role>) -> Option<Role> {
    roles.into_iter().min_by_key(Role::precedence)
}
