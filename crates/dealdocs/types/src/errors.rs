//! Error types for the deal document workflow

use crate::{ActionType, DocumentId, DocumentState, EmailAddress, Role};

/// Rejected document configuration.
///
/// Raised only at command boundaries. Read paths never validate; any
/// configuration that was once accepted keeps deriving a state.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Duplicate signing order: {order}")]
    DuplicateSigningOrder { order: u32 },

    #[error("Signing order must be positive, got {order}")]
    InvalidSigningOrder { order: u32 },

    #[error("Requirements demand a {role} but no assignment carries that role")]
    MissingAssignment { role: Role },

    #[error("Electronic signing and physical upload are mutually exclusive")]
    AmbiguousSignatureChannel,
}

/// Errors surfaced by workflow store commands
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Document not found: {0}")]
    UnknownDocument(DocumentId),

    #[error("Document has been removed: {0}")]
    DocumentRemoved(DocumentId),

    #[error("Document already exists: {0}")]
    DuplicateDocument(DocumentId),

    /// The requested action does not match the document's pending step.
    /// Carries the authoritative state so a stale caller can re-render
    /// without another query.
    #[error("{requested} by {performed_by} does not match the pending step on {document_id}")]
    ActionConflict {
        document_id: DocumentId,
        requested: ActionType,
        performed_by: EmailAddress,
        state: DocumentState,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
