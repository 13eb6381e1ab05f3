//! DOM error types.
//!
//! Variants follow the DOM exception taxonomy. Validation variants are
//! raised before any write; persistence failures surface as `InvalidState`.

use arbor_core::GraphError;
use arbor_transaction::TransactionError;
use thiserror::Error;

pub const NO_MODIFICATION_ALLOWED_MESSAGE: &str = "Permission denied.";
pub const INVALID_ACCESS_MESSAGE: &str = "Permission denied.";
pub const WRONG_DOCUMENT_MESSAGE: &str = "Node does not belong to this document.";
pub const HIERARCHY_SAME_NODE_MESSAGE: &str = "A node cannot accept itself as a child.";
pub const HIERARCHY_ANCESTOR_MESSAGE: &str = "A node cannot accept its own ancestor as child.";
pub const HIERARCHY_DOCUMENT_MESSAGE: &str = "A document may only have one document element.";
pub const HIERARCHY_ELEMENT_MESSAGE: &str =
    "A document may only accept an html element as its document element.";
pub const HIERARCHY_TEXT_MESSAGE: &str = "A text node cannot have children.";
pub const NOT_SUPPORTED_MESSAGE: &str = "Node type not supported.";
pub const NOT_FOUND_MESSAGE: &str = "Node is not a child.";
pub const NOT_SUPPORTED_IMPORT_DOC_MESSAGE: &str =
    "Document nodes cannot be imported into another document.";
pub const NOT_SUPPORTED_ADOPT_DOC_MESSAGE: &str =
    "Document nodes cannot be adopted by another document.";
pub const NOT_SUPPORTED_RENAME_MESSAGE: &str =
    "Renaming of nodes is not supported by this implementation.";
pub const NOT_SUPPORTED_CLONE_MESSAGE: &str =
    "Cloning of nodes is not supported by this implementation.";

/// Errors raised by the document node API.
#[derive(Debug, Error)]
pub enum DomError {
    /// Caller lacks write permission.
    #[error("NO_MODIFICATION_ALLOWED_ERR: {0}")]
    NoModificationAllowed(String),

    /// Caller lacks read permission.
    #[error("INVALID_ACCESS_ERR: {0}")]
    InvalidAccess(String),

    /// A node was offered as its own child.
    #[error("HIERARCHY_REQUEST_ERR: {0}")]
    HierarchyRequestSelf(String),

    /// A node was offered as a child of its own descendant.
    #[error("HIERARCHY_REQUEST_ERR: {0}")]
    HierarchyRequestAncestor(String),

    /// The document element constraint would be violated.
    #[error("HIERARCHY_REQUEST_ERR: {0}")]
    HierarchyRequestWrongRoot(String),

    /// The parent kind cannot hold children.
    #[error("HIERARCHY_REQUEST_ERR: {0}")]
    HierarchyRequest(String),

    /// Operands belong to different documents.
    #[error("WRONG_DOCUMENT_ERR: {0}")]
    WrongDocument(String),

    /// Operand is not a child of the node performing the operation.
    #[error("NOT_FOUND_ERR: {0}")]
    NotFoundChild(String),

    /// Unsupported node kind or unimplemented operation.
    #[error("NOT_SUPPORTED_ERR: {0}")]
    NotSupported(String),

    /// The backing store failed during a structural mutation.
    #[error("INVALID_STATE_ERR: {0}")]
    InvalidState(String),
}

impl DomError {
    pub fn no_modification_allowed() -> Self {
        Self::NoModificationAllowed(NO_MODIFICATION_ALLOWED_MESSAGE.to_string())
    }

    pub fn invalid_access() -> Self {
        Self::InvalidAccess(INVALID_ACCESS_MESSAGE.to_string())
    }

    pub fn wrong_document() -> Self {
        Self::WrongDocument(WRONG_DOCUMENT_MESSAGE.to_string())
    }

    pub fn not_found_child() -> Self {
        Self::NotFoundChild(NOT_FOUND_MESSAGE.to_string())
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Returns true for the hierarchy-request family.
    pub fn is_hierarchy_request(&self) -> bool {
        matches!(
            self,
            Self::HierarchyRequestSelf(_)
                | Self::HierarchyRequestAncestor(_)
                | Self::HierarchyRequestWrongRoot(_)
                | Self::HierarchyRequest(_)
        )
    }
}

impl From<TransactionError> for DomError {
    fn from(e: TransactionError) -> Self {
        Self::InvalidState(e.to_string())
    }
}

impl From<GraphError> for DomError {
    fn from(e: GraphError) -> Self {
        Self::InvalidState(e.to_string())
    }
}

/// Result type for DOM operations.
pub type DomResult<T> = Result<T, DomError>;
