//! Caller identity and permission checks.

use crate::schema::{props, RelType, PRINCIPAL_TYPE};
use crate::DomResult;
use arbor_core::{attrs, NodeId, Value};
use arbor_graph::Graph;
use arbor_transaction::Transaction;

/// Access level being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Read,
    Write,
}

/// Identity of the caller performing DOM operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityContext {
    /// Unrestricted access.
    SuperUser,
    /// A signed-in principal.
    User(NodeId),
    /// No principal.
    Anonymous,
}

impl SecurityContext {
    /// The principal node, if any.
    pub fn principal(&self) -> Option<NodeId> {
        match self {
            SecurityContext::User(id) => Some(*id),
            _ => None,
        }
    }

    /// Decide whether this caller holds `permission` on `node`.
    ///
    /// Only the owning principal may write. Visibility flags grant reads
    /// to everyone else.
    pub fn is_allowed(&self, graph: &Graph, node: NodeId, permission: Permission) -> bool {
        let principal = match self {
            SecurityContext::SuperUser => return true,
            SecurityContext::User(p) => Some(*p),
            SecurityContext::Anonymous => None,
        };

        let owner = owner_of(graph, node);
        if principal.is_some() && owner == principal {
            return true;
        }
        if permission == Permission::Write {
            return false;
        }

        let flag = |name: &str| {
            graph
                .get_node(node)
                .and_then(|n| n.get_attr(name))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };
        match principal {
            Some(_) => flag(props::VISIBLE_TO_AUTHENTICATED) || flag(props::VISIBLE_TO_PUBLIC),
            None => flag(props::VISIBLE_TO_PUBLIC),
        }
    }
}

/// The principal owning `node`, if any.
pub fn owner_of(graph: &Graph, node: NodeId) -> Option<NodeId> {
    graph
        .edges_to(node, Some(RelType::Owns.edge_type_id()))
        .into_iter()
        .filter_map(|id| graph.get_edge(id))
        .map(|edge| edge.source)
        .next()
}

/// Create a principal record.
pub fn create_principal(tx: &mut Transaction<'_>, name: &str) -> DomResult<NodeId> {
    Ok(tx.create_node(PRINCIPAL_TYPE, attrs! { props::NAME => name })?)
}
