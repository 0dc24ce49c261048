//! Domain entities and invariants for the directory permission model.

#![forbid(unsafe_code)]

mod access;
mod assignment;
mod ids;
mod role;
mod scope;

pub use access::{can_delete, can_revoke_role, can_update};
pub use assignment::{RoleAssignment, RoleSet};
pub use ids::{OrganisationId, ServiceId, UserId};
pub use role::{Role, RoleCategory, highest_role};
pub use scope::RoleScope;
