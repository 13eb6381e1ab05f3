//! Undo log for tracking applied changes.

use arbor_core::{Edge, EdgeId, Node, NodeId, Value};

/// One applied change, recorded with enough state to reverse it.
#[derive(Debug, Clone)]
pub enum UndoEntry {
    /// A node was created.
    CreatedNode(NodeId),
    /// An edge was created.
    CreatedEdge(EdgeId),
    /// A node was deleted, together with the edges its deletion cascaded to.
    DeletedNode { node: Node, edges: Vec<Edge> },
    /// An edge was deleted.
    DeletedEdge(Edge),
    /// A node property was written or removed.
    NodeAttr {
        node_id: NodeId,
        attr_name: String,
        previous: Option<Value>,
    },
    /// An edge property was written.
    EdgeAttr {
        edge_id: EdgeId,
        attr_name: String,
        previous: Option<Value>,
    },
}

/// Ordered record of the changes applied in one transaction.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    entries: Vec<UndoEntry>,
}

impl UndoLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a node creation.
    pub fn track_created_node(&mut self, id: NodeId) {
        self.entries.push(UndoEntry::CreatedNode(id));
    }

    /// Track an edge creation.
    pub fn track_created_edge(&mut self, id: EdgeId) {
        self.entries.push(UndoEntry::CreatedEdge(id));
    }

    /// Track a node deletion with its captured record and cascaded edges.
    pub fn track_deleted_node(&mut self, node: Node, edges: Vec<Edge>) {
        self.entries.push(UndoEntry::DeletedNode { node, edges });
    }

    /// Track an edge deletion with its captured record.
    pub fn track_deleted_edge(&mut self, edge: Edge) {
        self.entries.push(UndoEntry::DeletedEdge(edge));
    }

    /// Track a node property write.
    pub fn track_node_attr(&mut self, node_id: NodeId, attr_name: String, previous: Option<Value>) {
        self.entries.push(UndoEntry::NodeAttr {
            node_id,
            attr_name,
            previous,
        });
    }

    /// Track an edge property write.
    pub fn track_edge_attr(&mut self, edge_id: EdgeId, attr_name: String, previous: Option<Value>) {
        self.entries.push(UndoEntry::EdgeAttr {
            edge_id,
            attr_name,
            previous,
        });
    }

    /// Number of recorded changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain the entries newest-first, the order in which they must be undone.
    pub fn drain_reversed(&mut self) -> impl Iterator<Item = UndoEntry> + '_ {
        self.entries.drain(..).rev()
    }

    /// Forget all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
