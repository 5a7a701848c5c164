//! Error types for lineage resolution
//!
//! Every failure a traversal can hit is a `LineageError`. Errors are cloneable
//! so a failed listing can be replayed from the traversal snapshot and rendered
//! inline next to the branch it affected.

/// Error raised while resolving an object's lineage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineageError {
    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    #[error("{kind}/{name} not found in namespace {scope}")]
    NotFound {
        kind: String,
        name: String,
        scope: String,
    },

    #[error("Access denied listing {kind}: {message}")]
    AccessDenied { kind: String, message: String },

    #[error("Listing {kind} unavailable: {message}")]
    Unavailable { kind: String, message: String },

    #[error("Listing {kind} timed out after {seconds}s")]
    Timeout { kind: String, seconds: u64 },

    #[error("Cyclic ownership: {kind}/{name} is already on the ownership path")]
    CyclicOwnership { kind: String, name: String },

    #[error("Traversal cancelled")]
    Cancelled,

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
}

impl LineageError {
    /// Transport-level failures reported by a resource accessor
    pub fn is_access_failure(&self) -> bool {
        matches!(
            self,
            LineageError::AccessDenied { .. }
                | LineageError::Unavailable { .. }
                | LineageError::Timeout { .. }
        )
    }
}

/// Result type for lineage operations
pub type Result<T> = std::result::Result<T, LineageError>;
