use std::sync::Arc;

use crate::permission_ports::{DirectoryHierarchy, RoleAssignmentRepository};

mod checks;
mod grant;
mod lifecycle;
mod revoke;
mod visibility;


/// Application service deciding who may act on whom.
///
/// Wraps the assignment store and the directory hierarchy behind the grant
/// cascade, the revoke guards, the cross-actor authorization predicates and
/// the visibility queries. The service holds no state of its own; every
/// operation runs synchronously in the caller's context.
#[derive(Clone)]
pub struct PermissionService {
    assignments: Arc<dyn RoleAssignmentRepository>,
    hierarchy: Arc<dyn DirectoryHierarchy>,
}

impl PermissionService {
    /// Creates a new service from its storage and hierarchy ports.
    #[must_use]
    pub fn new(
        assignments: Arc<dyn RoleAssignmentRepository>,
        hierarchy: Arc<dyn DirectoryHierarchy>,
    ) -> Self {
        Self {
            assignments,
            hierarchy,
        }
    }
}
