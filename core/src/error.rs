//! Common error types for Arbor.

use crate::{EdgeId, NodeId};
use thiserror::Error;

/// Errors that can occur during graph store operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Node not found.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Edge not found.
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// A record with this identifier is already present.
    #[error("Duplicate identifier: {0}")]
    DuplicateId(String),

    /// Invalid operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl GraphError {
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
