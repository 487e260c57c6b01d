//! Error types
//!
//! Degraded information (a missing annotation, docstring section or
//! matching parameter) is never an error; the builders fall back to "Any"
//! or an absent field instead. What remains here are resolution failures,
//! usage errors and I/O around snapshots and configuration.

use pydoc_weld::{ObjectGraph, ObjectId, WeldError};
use thiserror::Error;

/// Result type for pydoc-etch operations
pub type EtchResult<T> = Result<T, EtchError>;

/// Main error type for pydoc-etch
#[derive(Debug, Error)]
pub enum EtchError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML configuration could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The object graph could not be loaded
    #[error("Snapshot error: {0}")]
    Weld(#[from] WeldError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested module does not exist
    #[error("Could not import module '{0}'.")]
    ModuleNotFound(String),

    /// The requested module exists but one of its own imports fails
    #[error("No module named '{missing}' (while importing '{module}')")]
    Import { module: String, missing: String },

    /// The module has no such attribute
    #[error("Attribute '{attribute}' not found in module '{module}'.")]
    AttributeNotFound { module: String, attribute: String },

    /// The resolved object is not a module, class, function or property
    #[error("Cannot document '{path}': unsupported {kind}")]
    UnsupportedEntity { path: String, kind: &'static str },

    /// A builder was handed the wrong kind of object
    #[error("Expected a {expected} at {id}, found {found}")]
    UnexpectedKind {
        id: ObjectId,
        expected: &'static str,
        found: &'static str,
    },
}

impl EtchError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        EtchError::Config(message.into())
    }

    /// Create an attribute error
    pub fn attribute_not_found(module: impl Into<String>, attribute: impl Into<String>) -> Self {
        EtchError::AttributeNotFound {
            module: module.into(),
            attribute: attribute.into(),
        }
    }

    /// Create a kind mismatch error for `id`
    pub fn unexpected_kind(graph: &ObjectGraph, id: ObjectId, expected: &'static str) -> Self {
        EtchError::UnexpectedKind {
            id,
            expected,
            found: graph.get(id).map(|o| o.kind_name()).unwrap_or("nothing"),
        }
    }

    /// Whether this is a resolution error (the import path names nothing)
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            EtchError::ModuleNotFound(_) | EtchError::AttributeNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_module_and_attribute() {
        let err = EtchError::ModuleNotFound("nonexistent.module".into());
        assert_eq!(err.to_string(), "Could not import module 'nonexistent.module'.");

        let err = EtchError::attribute_not_found("jetblack_markdown", "NoSuchAttr");
        assert_eq!(
            err.to_string(),
            "Attribute 'NoSuchAttr' not found in module 'jetblack_markdown'."
        );
        assert!(err.is_resolution_error());
    }

    #[test]
    fn test_unexpected_kind_reports_found_kind() {
        let mut graph = ObjectGraph::new();
        let value = graph.add_value(pydoc_weld::Value::Int(3));
        let err = EtchError::unexpected_kind(&graph, value, "class");
        assert!(matches!(
            err,
            EtchError::UnexpectedKind { expected: "class", found: "value", .. }
        ));
        assert!(!err.is_resolution_error());
    }
}
