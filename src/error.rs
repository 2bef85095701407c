//! Error handling for Draftspace
//!
//! Every hierarchy mutation validates before applying, so any error returned
//! here means the in-memory model is unchanged.

use thiserror::Error;

/// Result type alias for Draftspace operations
pub type Result<T> = std::result::Result<T, DraftError>;

/// Main error type for hierarchy operations
#[derive(Error, Debug)]
pub enum DraftError {
    /// An id did not resolve to an entity of the expected kind
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A name, color, elevation or height is outside its allowed domain
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    /// An attempt to violate a structural rule (delete the default layer,
    /// clear its default flag, reparent it away from root)
    #[error("Invariant violated: {reason}")]
    Invariant { reason: String },

    /// Non-forced delete of a layer that still has children
    #[error("Layer '{id}' has {child_count} child layer(s); move them out or delete with force")]
    HasChildren { id: String, child_count: usize },

    /// A reparent that would make a layer its own ancestor
    #[error("Moving layer '{id}' under '{target}' would create a cycle")]
    Cycle { id: String, target: String },

    /// An elevation range that intersects an existing level in the building
    #[error("Elevation conflict with level '{level_name}' occupying [{range_start}, {range_end})")]
    Overlap {
        level_name: String,
        range_start: f64,
        range_end: f64,
    },

    /// A locked layer can never become the drawing target
    #[error("Layer '{id}' is locked and cannot become the active layer")]
    LockedLayer { id: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DraftError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            DraftError::NotFound { .. } => "NOT_FOUND",
            DraftError::Validation { .. } => "VALIDATION_ERROR",
            DraftError::Invariant { .. } => "INVARIANT_ERROR",
            DraftError::HasChildren { .. } => "HAS_CHILDREN",
            DraftError::Cycle { .. } => "CYCLE_ERROR",
            DraftError::Overlap { .. } => "OVERLAP_ERROR",
            DraftError::LockedLayer { .. } => "LOCKED_LAYER",
            DraftError::Io(_) => "IO_ERROR",
            DraftError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the caller can fix this error by changing its input
    pub fn is_user_error(&self) -> bool {
        !matches!(self, DraftError::Io(_) | DraftError::Serialization(_))
    }

    /// Shorthand for a validation error with a formatted reason
    pub fn validation(reason: impl Into<String>) -> Self {
        DraftError::Validation {
            reason: reason.into(),
        }
    }

    /// Shorthand for an invariant error with a formatted reason
    pub fn invariant(reason: impl Into<String>) -> Self {
        DraftError::Invariant {
            reason: reason.into(),
        }
    }

    /// Shorthand for a not-found error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DraftError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
