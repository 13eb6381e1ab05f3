//! Entity structures for Arbor.
//!
//! Nodes and edges are the two record types the graph store persists.
//! Edges are directed and binary: one source node, one target node.

use crate::{Attributes, EdgeId, EdgeTypeId, NodeId, TypeId, Value};

/// A node record.
///
/// Equality is record equality: identifier, type, version and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// Type of this node.
    pub type_id: TypeId,
    /// Record version, bumped on every property write.
    pub version: u64,
    /// Property values.
    pub attributes: Attributes,
}

impl Node {
    /// Create a new node with the given properties.
    pub fn new(id: NodeId, type_id: TypeId, attributes: Attributes) -> Self {
        Self {
            id,
            type_id,
            version: 1,
            attributes,
        }
    }

    /// Get a property value by name.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set a property value.
    pub fn set_attr(&mut self, name: String, value: Value) {
        self.attributes.insert(name, value);
        self.version += 1;
    }

    /// Remove a property.
    pub fn remove_attr(&mut self, name: &str) -> Option<Value> {
        let result = self.attributes.remove(name);
        if result.is_some() {
            self.version += 1;
        }
        result
    }
}

/// A directed edge record.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Unique identifier for this edge.
    pub id: EdgeId,
    /// Relationship type of this edge.
    pub type_id: EdgeTypeId,
    /// Start node.
    pub source: NodeId,
    /// End node.
    pub target: NodeId,
    /// Record version, bumped on every property write.
    pub version: u64,
    /// Property values.
    pub attributes: Attributes,
}

impl Edge {
    /// Create a new edge with the given properties.
    pub fn new(
        id: EdgeId,
        type_id: EdgeTypeId,
        source: NodeId,
        target: NodeId,
        attributes: Attributes,
    ) -> Self {
        Self {
            id,
            type_id,
            source,
            target,
            version: 1,
            attributes,
        }
    }

    /// Get a property value by name.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set a property value.
    pub fn set_attr(&mut self, name: String, value: Value) {
        self.attributes.insert(name, value);
        self.version += 1;
    }
}
