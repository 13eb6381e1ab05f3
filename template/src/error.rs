//! Template error types.

use arbor_dom::DomError;
use thiserror::Error;

/// Errors raised while building an engine or resolving a template.
///
/// Malformed expressions never produce an error; they resolve to null.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex_lite::Error),

    #[error("Tree error: {0}")]
    Dom(#[from] DomError),

    #[error("Search failed: {message}")]
    Search { message: String },
}

impl TemplateError {
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
        }
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
