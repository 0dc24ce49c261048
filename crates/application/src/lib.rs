//! Application services and ports for the permission engine.

#![forbid(unsafe_code)]

mod permission_ports;
mod permission_service;

pub use permission_ports::{
    DirectoryHierarchy, RevokeGuard, RevokeOutcome, RoleAssignmentRepository,
};
pub use permission_service::PermissionService;
