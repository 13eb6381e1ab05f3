//! Node kinds, relationship types and well-known property names.

use arbor_core::{EdgeTypeId, TypeId};
use std::fmt;

/// Store type for principals (users that own nodes).
pub const PRINCIPAL_TYPE: TypeId = TypeId(10);

/// Store type for free-standing content records (search results, data rows).
pub const CONTENT_TYPE: TypeId = TypeId(11);

/// Well-known property names.
pub mod props {
    /// Tag name of an element.
    pub const TAG: &str = "tag";
    /// Character data of a text node.
    pub const CONTENT: &str = "content";
    /// Display name.
    pub const NAME: &str = "name";
    /// Readable by anonymous callers.
    pub const VISIBLE_TO_PUBLIC: &str = "visibleToPublicUsers";
    /// Readable by any signed-in principal.
    pub const VISIBLE_TO_AUTHENTICATED: &str = "visibleToAuthenticatedUsers";
}

/// The closed set of tree node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Fragment,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Document,
        NodeKind::Element,
        NodeKind::Text,
        NodeKind::Fragment,
    ];

    /// Store type used to persist this kind.
    pub const fn type_id(self) -> TypeId {
        match self {
            NodeKind::Document => TypeId(1),
            NodeKind::Element => TypeId(2),
            NodeKind::Text => TypeId(3),
            NodeKind::Fragment => TypeId(4),
        }
    }

    /// Map a store type back to a kind. Non-tree types yield None.
    pub fn from_type_id(type_id: TypeId) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_id() == type_id)
    }

    /// Whether nodes of this kind may hold children.
    pub fn accepts_children(self) -> bool {
        !matches!(self, NodeKind::Text)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Document => "Document",
            NodeKind::Element => "Element",
            NodeKind::Text => "Text",
            NodeKind::Fragment => "Fragment",
        };
        write!(f, "{}", name)
    }
}

/// Relationship types persisted as typed edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelType {
    /// Parent -> child.
    Contains,
    /// Previous sibling -> next sibling.
    NextListEntry,
    /// Node -> owning document.
    Page,
    /// Node -> explicitly linked node.
    Link,
    /// Principal -> owned node.
    Owns,
}

impl RelType {
    pub const fn edge_type_id(self) -> EdgeTypeId {
        match self {
            RelType::Contains => EdgeTypeId(1),
            RelType::NextListEntry => EdgeTypeId(2),
            RelType::Page => EdgeTypeId(3),
            RelType::Link => EdgeTypeId(4),
            RelType::Owns => EdgeTypeId(5),
        }
    }
}
