//! Error types raised by passes and by catalog construction.

use thiserror::Error;

/// Failure raised while a pass runs on a module.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassError {
    /// The module violates an IR invariant.
    #[error("verification failed: {0}")]
    Verification(String),

    /// The pass could not complete its rewrite.
    #[error("{0}")]
    Failed(String),
}

/// Errors building a pass catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate pass name '{0}' in catalog")]
    DuplicatePass(String),
}
