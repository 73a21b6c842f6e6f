//! Error types for the orchestration layer.
//!
//! Parser and merge anomalies never surface here; they are recovered
//! internally. What remains are caller mistakes (unknown ids) and
//! filesystem problems from the directory loader.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while orchestrating the graph.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The referenced node does not exist in the current graph.
    #[error("no node with id {id}")]
    NodeNotFound { id: String },

    /// The node exists but has no backing file content to edit.
    #[error("node {id} is not editable (kind {kind})")]
    NodeNotEditable { id: String, kind: String },

    /// A function node's owning file is missing from the file map.
    #[error("no file entry for {filename}")]
    FileNotFound { filename: String },

    /// A function node has no Imports edge back to a module node.
    #[error("cannot determine owning file of {id}")]
    OwningFileUnknown { id: String },

    /// The function header could not be located in its owning file.
    #[error("function {name} not found in {filename}")]
    FunctionNotInFile { name: String, filename: String },

    /// IO error from the directory loader.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
