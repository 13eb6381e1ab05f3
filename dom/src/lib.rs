//! Arbor DOM
//!
//! An ordered document tree persisted on the graph store: documents,
//! elements, text nodes and fragments linked by typed relationships,
//! with permission and hierarchy checks on every mutation.

pub mod error;
pub mod node;
pub mod schema;
pub mod security;
pub mod tree;
pub mod view;

pub use error::{DomError, DomResult};
pub use node::{Dom, DOCUMENT_ELEMENT_TAG};
pub use schema::{props, NodeKind, RelType, CONTENT_TYPE, PRINCIPAL_TYPE};
pub use security::{create_principal, owner_of, Permission, SecurityContext};
pub use tree::TreeManager;
pub use view::{AttachmentState, DomView};
