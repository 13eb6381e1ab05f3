//! Core graph storage implementation.

use crate::index::{AdjacencyIndex, AttributeIndex, TypeIndex};
use arbor_core::{
    Attributes, Edge, EdgeId, EdgeTypeId, GraphError, GraphResult, Node, NodeId, TypeId, Value,
};
use std::collections::HashMap;

/// ID allocator for nodes and edges.
#[derive(Debug)]
struct IdAllocator {
    next_node_id: u64,
    next_edge_id: u64,
}

impl IdAllocator {
    fn new() -> Self {
        Self {
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    fn alloc_node_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    fn alloc_edge_id(&mut self) -> EdgeId {
        let id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;
        id
    }
}

/// The in-memory graph storage.
#[derive(Debug)]
pub struct Graph {
    /// Node storage
    nodes: HashMap<NodeId, Node>,
    /// Edge storage
    edges: HashMap<EdgeId, Edge>,
    /// ID allocator
    id_alloc: IdAllocator,
    /// Type index
    type_index: TypeIndex,
    /// Attribute index
    attr_index: AttributeIndex,
    /// Adjacency index
    adj_index: AdjacencyIndex,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            id_alloc: IdAllocator::new(),
            type_index: TypeIndex::new(),
            attr_index: AttributeIndex::new(),
            adj_index: AdjacencyIndex::new(),
        }
    }

    // ==================== Node Operations ====================

    /// Create a new node with the given type and attributes.
    pub fn create_node(&mut self, type_id: TypeId, attributes: Attributes) -> NodeId {
        let id = self.id_alloc.alloc_node_id();
        self.insert_node(Node::new(id, type_id, attributes));
        id
    }

    fn insert_node(&mut self, node: Node) {
        self.type_index.insert(node.type_id, node.id);
        for (attr_name, value) in &node.attributes {
            self.attr_index.insert(node.type_id, attr_name, value, node.id);
        }
        self.nodes.insert(node.id, node);
    }

    /// Re-insert a previously captured node record under its original id.
    pub fn restore_node(&mut self, node: Node) -> GraphResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateId(node.id.to_string()));
        }
        self.insert_node(node);
        Ok(())
    }

    /// Get a node by ID.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Check whether a node exists.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Delete a node and all edges involving it.
    pub fn delete_node(&mut self, id: NodeId) -> GraphResult<()> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::NodeNotFound(id));
        }

        let edges_to_delete: Vec<EdgeId> = self.adj_index.edges_involving(id).collect();
        for edge_id in edges_to_delete {
            self.delete_edge(edge_id)?;
        }

        let node = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;
        self.type_index.remove(node.type_id, id);
        for (attr_name, value) in &node.attributes {
            self.attr_index.remove(node.type_id, attr_name, value, id);
        }

        Ok(())
    }

    /// Set an attribute on a node, returning the previous value.
    pub fn set_node_attr(
        &mut self,
        id: NodeId,
        attr_name: &str,
        value: Value,
    ) -> GraphResult<Option<Value>> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?;
        let type_id = node.type_id;

        let previous = node.attributes.get(attr_name).cloned();
        if let Some(old_value) = &previous {
            self.attr_index.remove(type_id, attr_name, old_value, id);
        }
        self.attr_index.insert(type_id, attr_name, &value, id);
        node.set_attr(attr_name.to_string(), value);

        Ok(previous)
    }

    /// Remove an attribute from a node, returning the previous value.
    pub fn remove_node_attr(&mut self, id: NodeId, attr_name: &str) -> GraphResult<Option<Value>> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?;
        let type_id = node.type_id;

        let previous = node.remove_attr(attr_name);
        if let Some(old_value) = &previous {
            self.attr_index.remove(type_id, attr_name, old_value, id);
        }

        Ok(previous)
    }

    // ==================== Edge Operations ====================

    /// Create a new directed edge.
    pub fn create_edge(
        &mut self,
        type_id: EdgeTypeId,
        source: NodeId,
        target: NodeId,
        attributes: Attributes,
    ) -> GraphResult<EdgeId> {
        for endpoint in [source, target] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(GraphError::NodeNotFound(endpoint));
            }
        }

        let id = self.id_alloc.alloc_edge_id();
        self.insert_edge(Edge::new(id, type_id, source, target, attributes));
        Ok(id)
    }

    fn insert_edge(&mut self, edge: Edge) {
        self.adj_index
            .insert(edge.id, edge.type_id, edge.source, edge.target);
        self.edges.insert(edge.id, edge);
    }

    /// Re-insert a previously captured edge record under its original id.
    pub fn restore_edge(&mut self, edge: Edge) -> GraphResult<()> {
        if self.edges.contains_key(&edge.id) {
            return Err(GraphError::DuplicateId(edge.id.to_string()));
        }
        for endpoint in [edge.source, edge.target] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(GraphError::NodeNotFound(endpoint));
            }
        }
        self.insert_edge(edge);
        Ok(())
    }

    /// Get an edge by ID.
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Delete an edge.
    pub fn delete_edge(&mut self, id: EdgeId) -> GraphResult<()> {
        let edge = self.edges.remove(&id).ok_or(GraphError::EdgeNotFound(id))?;

        self.adj_index
            .remove(id, edge.type_id, edge.source, edge.target);

        Ok(())
    }

    /// Set an attribute on an edge, returning the previous value.
    pub fn set_edge_attr(
        &mut self,
        id: EdgeId,
        attr_name: &str,
        value: Value,
    ) -> GraphResult<Option<Value>> {
        let edge = self
            .edges
            .get_mut(&id)
            .ok_or(GraphError::EdgeNotFound(id))?;

        let previous = edge.attributes.get(attr_name).cloned();
        edge.set_attr(attr_name.to_string(), value);

        Ok(previous)
    }

    // ==================== Query Operations ====================

    /// Find nodes by type.
    pub fn nodes_by_type(&self, type_id: TypeId) -> impl Iterator<Item = NodeId> + '_ {
        self.type_index.get(type_id)
    }

    /// Find nodes by attribute value (exact match).
    pub fn nodes_by_attr(
        &self,
        type_id: TypeId,
        attr_name: &str,
        value: &Value,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.attr_index.find_exact(type_id, attr_name, value)
    }

    /// Find edges leaving a node, in creation order.
    pub fn edges_from(&self, node_id: NodeId, edge_type: Option<EdgeTypeId>) -> Vec<EdgeId> {
        self.adj_index.edges_from(node_id, edge_type)
    }

    /// Find edges arriving at a node, in creation order.
    pub fn edges_to(&self, node_id: NodeId, edge_type: Option<EdgeTypeId>) -> Vec<EdgeId> {
        self.adj_index.edges_to(node_id, edge_type)
    }

    /// Find all edges touching a node.
    pub fn edges_involving(&self, node_id: NodeId) -> Vec<EdgeId> {
        self.adj_index.edges_involving(node_id).collect()
    }

    // ==================== Statistics ====================

    /// Get the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
