//! Shared primitives for all Rust crates in Civika.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across Civika crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// A role was paired with a scope that does not match its category,
    /// or a query supplied both an organisation and a service scope.
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// A revoke guard rejected the operation because a still-held role
    /// implies the one being removed.
    #[error("cannot revoke role: {0}")]
    CannotRevokeRole(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn cannot_revoke_role_formats_reason() {
        let error = AppError::CannotRevokeRole("blocked".to_owned());
        assert_eq!(error.to_string(), "cannot revoke role: blocked");
    }

    #[test]
    fn invalid_scope_formats_reason() {
        let error = AppError::InvalidScope("both supplied".to_owned());
        assert_eq!(error.to_string(), "invalid scope: both supplied");
    }
}
