//! Error types for the test framework.

use arbor_core::NodeId;
use arbor_dom::DomError;
use arbor_template::TemplateError;
use thiserror::Error;

/// Failures raised by fixtures and tree assertions.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("dom error: {0}")]
    Dom(#[from] DomError),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("sibling chain under {parent} is broken: {message}")]
    BrokenChain { parent: NodeId, message: String },

    #[error("{what} of {node}: expected {expected}, got {actual}")]
    Mismatch {
        node: NodeId,
        what: String,
        expected: String,
        actual: String,
    },
}

impl FixtureError {
    pub fn broken_chain(parent: NodeId, message: impl Into<String>) -> Self {
        Self::BrokenChain {
            parent,
            message: message.into(),
        }
    }

    pub fn mismatch(
        node: NodeId,
        what: impl Into<String>,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) -> Self {
        Self::Mismatch {
            node,
            what: what.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Result type for fixtures and assertions.
pub type FixtureResult<T> = Result<T, FixtureError>;
