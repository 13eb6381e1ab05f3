//! Transaction error types.

use arbor_core::GraphError;
use thiserror::Error;

/// Transaction errors.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The transaction has already been committed or rolled back.
    #[error("no transaction is active")]
    NoActiveTransaction,

    /// A write was attempted inside a read-only transaction.
    #[error("transaction is read-only: cannot {operation}")]
    ReadOnly { operation: String },

    /// The graph store rejected a read or write.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Undoing the transaction failed; the store may be inconsistent.
    #[error("rollback failed: {message}")]
    RollbackFailed { message: String },
}

impl TransactionError {
    pub fn read_only(operation: impl Into<String>) -> Self {
        Self::ReadOnly {
            operation: operation.into(),
        }
    }

    pub fn rollback_failed(message: impl Into<String>) -> Self {
        Self::RollbackFailed {
            message: message.into(),
        }
    }
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
