//! Error types for the Leihwerk core

use thiserror::Error;

use crate::store::StoreError;

/// Main application error type
///
/// Every fallible operation in the crate resolves to one of these kinds.
/// All of them are recoverable at the triggering action's boundary: the
/// embedding UI reports them and moves on, nothing here aborts the process.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required form field is missing or empty. The write was never
    /// attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced document was absent at read/write time.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing store could not be reached. The original write is not
    /// retried; the user re-triggers the action.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A status change was requested that the entity's lifecycle does not
    /// permit from its current state. No state change was applied.
    #[error("Invalid transition: cannot {action} from status '{from}'")]
    InvalidTransition { action: String, from: String },

    /// A lending-policy rejection (e.g. a second active request for the
    /// same equipment while the single-request policy is enabled).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error: malformed stored documents and other faults the
    /// user cannot act on.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build the lifecycle-violation error for a refused edge.
    pub fn invalid_transition(action: impl Into<String>, from: impl ToString) -> Self {
        AppError::InvalidTransition {
            action: action.into(),
            from: from.to_string(),
        }
    }

    /// Stable lowercase tag for log fields and UI notification routing.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                AppError::NotFound(format!("No document {} in '{}'", id, collection))
            }
            StoreError::Unavailable(msg) => AppError::StoreUnavailable(msg),
            StoreError::Malformed(e) => AppError::Internal(format!("Malformed document: {}", e)),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
