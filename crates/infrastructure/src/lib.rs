//! Infrastructure adapters for the permission engine's ports.

#![forbid(unsafe_code)]

mod in_memory_directory_hierarchy;
mod in_memory_role_assignment_repository;
mod postgres_directory_hierarchy;
mod postgres_role_assignment_repository;

pub use in_memory_directory_hierarchy::InMemoryDirectoryHierarchy;
pub use in_memory_role_assignment_repository::InMemoryRoleAssignmentRepository;
pub use postgres_directory_hierarchy::PostgresDirectoryHierarchy;
pub use postgres_role_assignment_repository::PostgresRoleAssignmentRepository;

/// Embedded migrations for the assignment store schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
