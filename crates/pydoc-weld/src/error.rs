//! Errors raised while loading or validating a snapshot

use std::path::PathBuf;
use thiserror::Error;

/// Result type for pydoc-weld operations
pub type WeldResult<T> = Result<T, WeldError>;

/// Errors that can occur while loading an object graph
#[derive(Debug, Error)]
pub enum WeldError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file could not be read
    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(PathBuf),

    /// JSON error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An object refers to an id outside the graph
    #[error("object {from} refers to missing object {missing} (graph holds {len} objects)")]
    DanglingObject {
        from: usize,
        missing: usize,
        len: usize,
    },

    /// The module registry points at something that is not a module
    #[error("module registry entry '{0}' is not a module")]
    NotAModule(String),

    /// Members can only be bound on modules and classes
    #[error("cannot bind '{name}' on {id}: a {kind} has no namespace")]
    NotANamespace {
        id: usize,
        name: String,
        kind: &'static str,
    },
}
