//! Indexes for efficient graph lookups.
//!
//! Edge sets are kept in `BTreeSet`s: edge ids are allocated monotonically,
//! so iteration order is creation order, including for restored records.

use arbor_core::{EdgeId, EdgeTypeId, NodeId, TypeId, Value};
use std::collections::{BTreeSet, HashMap};

/// Type index: TypeId -> Set<NodeId>
#[derive(Debug, Default)]
pub struct TypeIndex {
    index: HashMap<TypeId, BTreeSet<NodeId>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_id: TypeId, node_id: NodeId) {
        self.index.entry(type_id).or_default().insert(node_id);
    }

    pub fn remove(&mut self, type_id: TypeId, node_id: NodeId) {
        if let Some(set) = self.index.get_mut(&type_id) {
            set.remove(&node_id);
            if set.is_empty() {
                self.index.remove(&type_id);
            }
        }
    }

    pub fn get(&self, type_id: TypeId) -> impl Iterator<Item = NodeId> + '_ {
        self.index
            .get(&type_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// Key for attribute index: (TypeId, attribute name, value)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrKey {
    pub type_id: TypeId,
    pub attr_name: String,
    pub value: AttrValue,
}

/// Simplified value for attribute indexing.
/// Only exact matches on scalar values are indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    String(String),
    NodeRef(NodeId),
}

impl AttrValue {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(AttrValue::Bool(*b)),
            Value::Int(i) => Some(AttrValue::Int(*i)),
            Value::String(s) => Some(AttrValue::String(s.clone())),
            Value::NodeRef(id) => Some(AttrValue::NodeRef(*id)),
            // Null, Float and List are not indexed
            _ => None,
        }
    }
}

/// Attribute index: (TypeId, attr_name, value) -> Set<NodeId>
#[derive(Debug, Default)]
pub struct AttributeIndex {
    exact: HashMap<AttrKey, BTreeSet<NodeId>>,
}

impl AttributeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(type_id: TypeId, attr_name: &str, value: &Value) -> Option<AttrKey> {
        AttrValue::from_value(value).map(|value| AttrKey {
            type_id,
            attr_name: attr_name.to_string(),
            value,
        })
    }

    pub fn insert(&mut self, type_id: TypeId, attr_name: &str, value: &Value, node_id: NodeId) {
        if let Some(key) = Self::key(type_id, attr_name, value) {
            self.exact.entry(key).or_default().insert(node_id);
        }
    }

    pub fn remove(&mut self, type_id: TypeId, attr_name: &str, value: &Value, node_id: NodeId) {
        if let Some(key) = Self::key(type_id, attr_name, value) {
            if let Some(set) = self.exact.get_mut(&key) {
                set.remove(&node_id);
                if set.is_empty() {
                    self.exact.remove(&key);
                }
            }
        }
    }

    pub fn find_exact(
        &self,
        type_id: TypeId,
        attr_name: &str,
        value: &Value,
    ) -> impl Iterator<Item = NodeId> + '_ {
        Self::key(type_id, attr_name, value)
            .and_then(|key| self.exact.get(&key))
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

type TypedEdges = HashMap<EdgeTypeId, BTreeSet<EdgeId>>;

/// Adjacency index: NodeId -> { outbound: Map<EdgeTypeId, Set<EdgeId>>, inbound: ... }
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    /// Edges where the node is the source
    outbound: HashMap<NodeId, TypedEdges>,
    /// Edges where the node is the target
    inbound: HashMap<NodeId, TypedEdges>,
    /// All edges involving a node
    all: HashMap<NodeId, BTreeSet<EdgeId>>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, edge_id: EdgeId, edge_type_id: EdgeTypeId, source: NodeId, target: NodeId) {
        for node_id in [source, target] {
            self.all.entry(node_id).or_default().insert(edge_id);
        }
        self.outbound
            .entry(source)
            .or_default()
            .entry(edge_type_id)
            .or_default()
            .insert(edge_id);
        self.inbound
            .entry(target)
            .or_default()
            .entry(edge_type_id)
            .or_default()
            .insert(edge_id);
    }

    pub fn remove(&mut self, edge_id: EdgeId, edge_type_id: EdgeTypeId, source: NodeId, target: NodeId) {
        for node_id in [source, target] {
            if let Some(set) = self.all.get_mut(&node_id) {
                set.remove(&edge_id);
                if set.is_empty() {
                    self.all.remove(&node_id);
                }
            }
        }
        Self::remove_typed(&mut self.outbound, source, edge_type_id, edge_id);
        Self::remove_typed(&mut self.inbound, target, edge_type_id, edge_id);
    }

    fn remove_typed(
        index: &mut HashMap<NodeId, TypedEdges>,
        node_id: NodeId,
        edge_type_id: EdgeTypeId,
        edge_id: EdgeId,
    ) {
        if let Some(type_map) = index.get_mut(&node_id) {
            if let Some(set) = type_map.get_mut(&edge_type_id) {
                set.remove(&edge_id);
                if set.is_empty() {
                    type_map.remove(&edge_type_id);
                }
            }
            if type_map.is_empty() {
                index.remove(&node_id);
            }
        }
    }

    fn typed(
        index: &HashMap<NodeId, TypedEdges>,
        node_id: NodeId,
        edge_type: Option<EdgeTypeId>,
    ) -> Vec<EdgeId> {
        let Some(type_map) = index.get(&node_id) else {
            return Vec::new();
        };
        match edge_type {
            Some(et) => type_map
                .get(&et)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default(),
            None => {
                let mut all: Vec<EdgeId> =
                    type_map.values().flat_map(|set| set.iter().copied()).collect();
                all.sort();
                all
            }
        }
    }

    /// Get edges leaving a node, in creation order.
    pub fn edges_from(&self, node_id: NodeId, edge_type: Option<EdgeTypeId>) -> Vec<EdgeId> {
        Self::typed(&self.outbound, node_id, edge_type)
    }

    /// Get edges arriving at a node, in creation order.
    pub fn edges_to(&self, node_id: NodeId, edge_type: Option<EdgeTypeId>) -> Vec<EdgeId> {
        Self::typed(&self.inbound, node_id, edge_type)
    }

    /// Get all edges involving a node.
    pub fn edges_involving(&self, node_id: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.all
            .get(&node_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}
