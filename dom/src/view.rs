//! Read-only view over document nodes.
//!
//! No permission checks happen here; the `Dom` API layers them on top.

use crate::schema::{props, NodeKind, RelType};
use crate::tree::TreeManager;
use crate::{DomError, DomResult};
use arbor_core::{Node, NodeId, Value};
use arbor_graph::Graph;

/// Whether a node is reachable from a Document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentState {
    Attached,
    Detached,
}

/// Unchecked reads over the document tree.
#[derive(Debug, Clone, Copy)]
pub struct DomView<'a> {
    graph: &'a Graph,
    tree: TreeManager,
}

impl<'a> DomView<'a> {
    pub fn new(graph: &'a Graph, tree: TreeManager) -> Self {
        Self { graph, tree }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn tree(&self) -> TreeManager {
        self.tree
    }

    /// The backing record.
    pub fn record(&self, node: NodeId) -> DomResult<&'a Node> {
        self.graph
            .get_node(node)
            .ok_or_else(|| DomError::invalid_state(format!("Node not found: {}", node)))
    }

    /// Kind of a tree node. Records of any other type are not supported.
    pub fn kind(&self, node: NodeId) -> DomResult<NodeKind> {
        let record = self.record(node)?;
        NodeKind::from_type_id(record.type_id)
            .ok_or_else(|| DomError::not_supported(crate::error::NOT_SUPPORTED_MESSAGE))
    }

    pub fn get_property(&self, node: NodeId, key: &str) -> Option<&'a Value> {
        self.graph.get_node(node).and_then(|n| n.get_attr(key))
    }

    /// Tag of an element.
    pub fn tag_name(&self, node: NodeId) -> Option<&'a str> {
        match self.kind(node).ok()? {
            NodeKind::Element => self.get_property(node, props::TAG).and_then(Value::as_str),
            _ => None,
        }
    }

    /// Character data of a text node.
    pub fn node_value(&self, node: NodeId) -> Option<&'a str> {
        match self.kind(node).ok()? {
            NodeKind::Text => self.get_property(node, props::CONTENT).and_then(Value::as_str),
            _ => None,
        }
    }

    // ========== Navigation ==========

    pub fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(self.graph, node)
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.tree.first_child(self.graph, node)
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.tree.last_child(self.graph, node)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.tree.next_sibling(self.graph, node)
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.tree.previous_sibling(self.graph, node)
    }

    pub fn child_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.children(self.graph, node)
    }

    pub fn has_child_nodes(&self, node: NodeId) -> bool {
        self.tree.has_children(self.graph, node)
    }

    pub fn child_position(&self, node: NodeId) -> Option<usize> {
        self.tree.child_position(self.graph, node)
    }

    /// Parent chain from the immediate parent upwards.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent_node(node);
        while let Some(parent) = current {
            if parent == node || result.contains(&parent) {
                break;
            }
            result.push(parent);
            current = self.parent_node(parent);
        }
        result
    }

    /// Descendants in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.child_nodes(node).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.child_nodes(current).into_iter().rev());
        }
        result
    }

    // ========== Relationships ==========

    /// First node reached over an outgoing edge of `rel`.
    pub fn related(&self, node: NodeId, rel: RelType) -> Option<NodeId> {
        self.graph
            .edges_from(node, Some(rel.edge_type_id()))
            .into_iter()
            .filter_map(|id| self.graph.get_edge(id))
            .map(|edge| edge.target)
            .next()
    }

    /// The Document a node belongs to. A Document belongs to itself.
    pub fn owner_document(&self, node: NodeId) -> Option<NodeId> {
        match self.kind(node) {
            Ok(NodeKind::Document) => Some(node),
            _ => self.related(node, RelType::Page),
        }
    }

    /// The node reached over the explicit link relationship.
    pub fn linked_node(&self, node: NodeId) -> Option<NodeId> {
        self.related(node, RelType::Link)
    }

    pub fn attachment_state(&self, node: NodeId) -> AttachmentState {
        let is_document = |n: NodeId| matches!(self.kind(n), Ok(NodeKind::Document));
        if is_document(node) || self.ancestors(node).into_iter().any(is_document) {
            AttachmentState::Attached
        } else {
            AttachmentState::Detached
        }
    }

    // ========== Content ==========

    /// Concatenated character data of the subtree in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        std::iter::once(node)
            .chain(self.descendants(node))
            .filter_map(|n| self.node_value(n))
            .collect()
    }

    /// Elements below `node` whose tag matches, in document order.
    /// `*` matches every element.
    pub fn elements_by_tag_name(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|n| match self.tag_name(*n) {
                Some(t) => tag == "*" || t == tag,
                None => false,
            })
            .collect()
    }

    // ========== Identity ==========

    pub fn is_same_node(&self, a: NodeId, b: NodeId) -> bool {
        a == b
    }

    /// Record equality of the two backing nodes.
    pub fn is_equal_node(&self, a: NodeId, b: NodeId) -> bool {
        match (self.graph.get_node(a), self.graph.get_node(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}
