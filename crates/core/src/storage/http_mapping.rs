//! Pure functions for mapping repository errors to HTTP status codes.
//!
//! This module provides HTTP status code mappings for [`RepositoryError`] variants,
//! following the Functional Core pattern - pure functions with no side effects.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `Database` -> 500 (Internal Server Error)
/// - `NotFound` -> 404 (Not Found)
/// - `Cache` -> 500 (Internal Server Error)
/// - `Validation` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use schoolhub_core::entity::EntityKind;
/// use schoolhub_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::not_found(EntityKind::User, "u-123");
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::Database { .. } => 500,
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::Cache { .. } => 500,
        RepositoryError::Validation { .. } => 400,
    }
}
