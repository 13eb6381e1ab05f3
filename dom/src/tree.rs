//! Ordered child lists persisted as typed edges.
//!
//! Parent -> child links use the children relationship; siblings form a
//! singly linked chain over the sibling relationship. The head of a chain
//! is the child with no inbound sibling edge.
//!
//! Reads take `&Graph`. Writes go through a `Transaction` and assume the
//! caller has validated the operands: they uphold the chain invariants
//! but do not check permissions or hierarchy rules.

use crate::schema::RelType;
use crate::{DomError, DomResult};
use arbor_core::{attrs, EdgeId, EdgeTypeId, NodeId};
use arbor_graph::Graph;
use arbor_transaction::Transaction;

/// Maintains parent/child and sibling relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeManager {
    children: EdgeTypeId,
    siblings: EdgeTypeId,
}

impl Default for TreeManager {
    fn default() -> Self {
        Self::new(
            RelType::Contains.edge_type_id(),
            RelType::NextListEntry.edge_type_id(),
        )
    }
}

impl TreeManager {
    /// Create a manager over the given relationship types.
    pub fn new(children: EdgeTypeId, siblings: EdgeTypeId) -> Self {
        Self { children, siblings }
    }

    pub fn children_rel(&self) -> EdgeTypeId {
        self.children
    }

    pub fn siblings_rel(&self) -> EdgeTypeId {
        self.siblings
    }

    // ========== Reads ==========

    fn parent_edge(&self, graph: &Graph, node: NodeId) -> Option<EdgeId> {
        graph.edges_to(node, Some(self.children)).into_iter().next()
    }

    /// The node holding `node` as a child.
    pub fn parent(&self, graph: &Graph, node: NodeId) -> Option<NodeId> {
        self.parent_edge(graph, node)
            .and_then(|id| graph.get_edge(id))
            .map(|edge| edge.source)
    }

    /// Children of `parent` in creation order of their links, not list order.
    fn linked_children(&self, graph: &Graph, parent: NodeId) -> Vec<NodeId> {
        graph
            .edges_from(parent, Some(self.children))
            .into_iter()
            .filter_map(|id| graph.get_edge(id))
            .map(|edge| edge.target)
            .collect()
    }

    fn sibling_edge(&self, graph: &Graph, from: NodeId, to: NodeId) -> Option<EdgeId> {
        graph
            .edges_from(from, Some(self.siblings))
            .into_iter()
            .find(|id| graph.get_edge(*id).is_some_and(|edge| edge.target == to))
    }

    pub fn next_sibling(&self, graph: &Graph, node: NodeId) -> Option<NodeId> {
        graph
            .edges_from(node, Some(self.siblings))
            .into_iter()
            .filter_map(|id| graph.get_edge(id))
            .map(|edge| edge.target)
            .next()
    }

    pub fn previous_sibling(&self, graph: &Graph, node: NodeId) -> Option<NodeId> {
        graph
            .edges_to(node, Some(self.siblings))
            .into_iter()
            .filter_map(|id| graph.get_edge(id))
            .map(|edge| edge.source)
            .next()
    }

    /// The head of the sibling chain.
    pub fn first_child(&self, graph: &Graph, parent: NodeId) -> Option<NodeId> {
        self.linked_children(graph, parent)
            .into_iter()
            .find(|child| self.previous_sibling(graph, *child).is_none())
    }

    /// The tail of the sibling chain.
    pub fn last_child(&self, graph: &Graph, parent: NodeId) -> Option<NodeId> {
        self.linked_children(graph, parent)
            .into_iter()
            .find(|child| self.next_sibling(graph, *child).is_none())
    }

    pub fn has_children(&self, graph: &Graph, parent: NodeId) -> bool {
        !graph.edges_from(parent, Some(self.children)).is_empty()
    }

    /// Children of `parent` in list order.
    pub fn children(&self, graph: &Graph, parent: NodeId) -> Vec<NodeId> {
        let limit = graph.edges_from(parent, Some(self.children)).len();
        let mut result = Vec::with_capacity(limit);
        let mut current = self.first_child(graph, parent);
        while let Some(child) = current {
            if result.len() == limit {
                break;
            }
            result.push(child);
            current = self.next_sibling(graph, child);
        }
        result
    }

    /// Zero-based position of `node` in its parent's list.
    pub fn child_position(&self, graph: &Graph, node: NodeId) -> Option<usize> {
        let parent = self.parent(graph, node)?;
        self.children(graph, parent).iter().position(|c| *c == node)
    }

    pub fn is_child_of(&self, graph: &Graph, parent: NodeId, node: NodeId) -> bool {
        self.parent(graph, node) == Some(parent)
    }

    // ========== Writes ==========

    /// Take `node` out of its sibling chain, bridging its neighbours.
    fn unlink(&self, tx: &mut Transaction<'_>, node: NodeId) -> DomResult<()> {
        let graph = tx.graph();
        let prev = self.previous_sibling(graph, node);
        let next = self.next_sibling(graph, node);
        let mut stale = graph.edges_to(node, Some(self.siblings));
        stale.extend(graph.edges_from(node, Some(self.siblings)));

        for edge in stale {
            tx.delete_edge(edge)?;
        }
        if let (Some(prev), Some(next)) = (prev, next) {
            tx.create_edge(self.siblings, prev, next, attrs!())?;
        }
        Ok(())
    }

    /// Detach `child` from `parent`.
    pub fn remove_child(
        &self,
        tx: &mut Transaction<'_>,
        parent: NodeId,
        child: NodeId,
    ) -> DomResult<()> {
        if !self.is_child_of(tx.graph(), parent, child) {
            return Err(DomError::not_found_child());
        }
        self.unlink(tx, child)?;
        let links: Vec<EdgeId> = tx
            .graph()
            .edges_to(child, Some(self.children))
            .into_iter()
            .filter(|id| tx.get_edge(*id).is_some_and(|e| e.source == parent))
            .collect();
        for edge in links {
            tx.delete_edge(edge)?;
        }
        Ok(())
    }

    fn detach(&self, tx: &mut Transaction<'_>, node: NodeId) -> DomResult<()> {
        if let Some(parent) = self.parent(tx.graph(), node) {
            self.remove_child(tx, parent, node)?;
        }
        Ok(())
    }

    /// Make `child` the last child of `parent`, detaching it first.
    pub fn append_child(
        &self,
        tx: &mut Transaction<'_>,
        parent: NodeId,
        child: NodeId,
    ) -> DomResult<()> {
        self.detach(tx, child)?;
        let last = self.last_child(tx.graph(), parent);
        tx.create_edge(self.children, parent, child, attrs!())?;
        if let Some(last) = last {
            tx.create_edge(self.siblings, last, child, attrs!())?;
        }
        Ok(())
    }

    /// Insert `child` immediately before `reference`, or append when
    /// `reference` is None.
    pub fn insert_before(
        &self,
        tx: &mut Transaction<'_>,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        let Some(reference) = reference else {
            return self.append_child(tx, parent, child);
        };
        if !self.is_child_of(tx.graph(), parent, reference) {
            return Err(DomError::not_found_child());
        }
        if reference == child {
            return Ok(());
        }

        self.detach(tx, child)?;
        let prev = self.previous_sibling(tx.graph(), reference);
        if let Some(prev) = prev {
            if let Some(edge) = self.sibling_edge(tx.graph(), prev, reference) {
                tx.delete_edge(edge)?;
            }
        }
        tx.create_edge(self.children, parent, child, attrs!())?;
        if let Some(prev) = prev {
            tx.create_edge(self.siblings, prev, child, attrs!())?;
        }
        tx.create_edge(self.siblings, child, reference, attrs!())?;
        Ok(())
    }

    /// Put `new_child` in the position of `old_child` and detach the latter.
    pub fn replace_child(
        &self,
        tx: &mut Transaction<'_>,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<()> {
        if !self.is_child_of(tx.graph(), parent, old_child) {
            return Err(DomError::not_found_child());
        }
        if new_child == old_child {
            return Ok(());
        }
        self.insert_before(tx, parent, new_child, Some(old_child))?;
        self.remove_child(tx, parent, old_child)
    }

    /// Move every child of `fragment` in order to just before `reference`
    /// (or to the end). The fragment is left empty.
    pub fn transfer_children(
        &self,
        tx: &mut Transaction<'_>,
        fragment: NodeId,
        parent: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<Vec<NodeId>> {
        let mut moved = Vec::new();
        let mut current = self.first_child(tx.graph(), fragment);
        while let Some(child) = current {
            let saved_next = self.next_sibling(tx.graph(), child);
            self.remove_child(tx, fragment, child)?;
            self.insert_before(tx, parent, child, reference)?;
            moved.push(child);
            current = saved_next;
        }
        Ok(moved)
    }
}
