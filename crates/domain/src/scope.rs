use serde::{Deserialize, Serialize};

use crate::ids::{OrganisationId, ServiceId};
use crate::role::RoleCategory;

/// The resource a role assignment applies to.
///
/// Exactly one variant per assignment: global roles carry [`RoleScope::Global`],
/// organisation admin carries the organisation, service roles carry the
/// service. Which variant a role may carry is fixed by
/// [`crate::Role::category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RoleScope {
    /// No scoping resource; the assignment applies platform-wide.
    Global,
    /// Scoped to one organisation.
    Organisation {
        /// The scoping organisation.
        id: OrganisationId,
    },
    /// Scoped to one service.
    Service {
        /// The scoping service.
        id: ServiceId,
    },
}

impl RoleScope {
    /// Returns the category this scope belongs to.
    #[must_use]
    pub fn category(&self) -> RoleCategory {
        match self {
            Self::Global => RoleCategory::Global,
            Self::Organisation { .. } => RoleCategory::OrganisationScoped,
            Self::Service { .. } => RoleCategory::ServiceScoped,
        }
    }

    /// Returns the organisation id for organisation-scoped values.
    #[must_use]
    pub fn organisation_id(&self) -> Option<OrganisationId> {
        match self {
            Self::Organisation { id } => Some(*id),
            _ => None,
        }
    }

    /// Returns the service id for service-scoped values.
    #[must_use]
    pub fn service_id(&self) -> Option<ServiceId> {
        match self {
            Self::Service { id } => Some(*id),
            _ => None,
        }
    }

    /// Creates an organisation scope.
    #[must_use]
    pub fn organisation(id: OrganisationId) -> Self {
        Self::Organisation { id }
    }

    /// Creates a service scope.
    #[must_use]
    pub fn service(id: ServiceId) -> Self {
        Self::Service { id }
    }
}

impl std::fmt::Display for RoleScope {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(formatter, "global"),
            Self::Organisation { id } => write!(formatter, "organisation {id}"),
            Self::Service { id } => write!(formatter, "service {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RoleScope;
    use crate::ids::{OrganisationId, ServiceId};
    use crate::role::RoleCategory;

    #[test]
    fn scope_categories_match_variants() {
        assert_eq!(RoleScope::Global.category(), RoleCategory::Global);
        assert_eq!(
            RoleScope::organisation(OrganisationId::new()).category(),
            RoleCategory::OrganisationScoped
        );
        assert_eq!(
            RoleScope::service(ServiceId::new()).category(),
            RoleCategory::ServiceScoped
        );
    }

    #[test]
    fn accessors_return_the_scoping_id() {
        let organisation_id = OrganisationId::new();
        let scope = RoleScope::organisation(organisation_id);
        assert_eq!(scope.organisation_id(), Some(organisation_id));
        assert_eq!(scope.service_id(), None);
    }
}
