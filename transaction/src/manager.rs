//! Transactions over the graph store.

use arbor_core::{Attributes, Edge, EdgeId, EdgeTypeId, Node, NodeId, TypeId, Value};
use arbor_graph::Graph;
use tracing::{debug, warn};

use crate::buffer::{UndoEntry, UndoLog};
use crate::error::{TransactionError, TransactionResult};

/// Transaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction is active.
    Active,
    /// Transaction was committed.
    Committed,
    /// Transaction was rolled back, explicitly or by being dropped.
    RolledBack,
}

/// Whether a transaction may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    ReadWrite,
    ReadOnly,
}

/// A transaction over a graph.
///
/// Changes are applied to the graph immediately and tracked in an undo log,
/// so reads inside the transaction see its own writes. Dropping an active
/// transaction rolls it back.
pub struct Transaction<'g> {
    graph: &'g mut Graph,
    state: TransactionState,
    mode: TransactionMode,
    undo: UndoLog,
}

impl<'g> Transaction<'g> {
    /// Begin a read-write transaction.
    pub fn begin(graph: &'g mut Graph) -> Self {
        Self::with_mode(graph, TransactionMode::ReadWrite)
    }

    /// Begin a transaction that rejects every write.
    pub fn begin_read_only(graph: &'g mut Graph) -> Self {
        Self::with_mode(graph, TransactionMode::ReadOnly)
    }

    fn with_mode(graph: &'g mut Graph, mode: TransactionMode) -> Self {
        debug!(?mode, "begin transaction");
        Self {
            graph,
            state: TransactionState::Active,
            mode,
            undo: UndoLog::new(),
        }
    }

    /// Check if the transaction is active.
    pub fn is_active(&self) -> bool {
        self.state == TransactionState::Active
    }

    /// Get the current transaction state.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Check if writes are rejected.
    pub fn is_read_only(&self) -> bool {
        self.mode == TransactionMode::ReadOnly
    }

    /// Number of changes applied so far.
    pub fn pending_changes(&self) -> usize {
        self.undo.len()
    }

    /// Read access to the graph, including this transaction's own writes.
    pub fn graph(&self) -> &Graph {
        self.graph
    }

    // ========== Transaction Lifecycle ==========

    /// Commit the transaction.
    pub fn commit(mut self) -> TransactionResult<()> {
        self.ensure_active()?;
        debug!(changes = self.undo.len(), "commit transaction");
        self.undo.clear();
        self.state = TransactionState::Committed;
        Ok(())
    }

    /// Roll the transaction back, undoing every applied change.
    pub fn rollback(mut self) -> TransactionResult<()> {
        self.ensure_active()?;
        self.do_rollback()
    }

    fn do_rollback(&mut self) -> TransactionResult<()> {
        debug!(changes = self.undo.len(), "rollback transaction");
        self.state = TransactionState::RolledBack;

        let entries: Vec<UndoEntry> = self.undo.drain_reversed().collect();
        for entry in entries {
            Self::undo_entry(self.graph, entry)
                .map_err(|e| TransactionError::rollback_failed(e.to_string()))?;
        }
        Ok(())
    }

    fn undo_entry(graph: &mut Graph, entry: UndoEntry) -> TransactionResult<()> {
        match entry {
            UndoEntry::CreatedNode(id) => graph.delete_node(id)?,
            UndoEntry::CreatedEdge(id) => graph.delete_edge(id)?,
            UndoEntry::DeletedNode { node, edges } => {
                graph.restore_node(node)?;
                for edge in edges {
                    graph.restore_edge(edge)?;
                }
            }
            UndoEntry::DeletedEdge(edge) => graph.restore_edge(edge)?,
            UndoEntry::NodeAttr {
                node_id,
                attr_name,
                previous,
            } => match previous {
                Some(value) => {
                    graph.set_node_attr(node_id, &attr_name, value)?;
                }
                None => {
                    graph.remove_node_attr(node_id, &attr_name)?;
                }
            },
            UndoEntry::EdgeAttr {
                edge_id,
                attr_name,
                previous,
            } => {
                graph.set_edge_attr(edge_id, &attr_name, previous.unwrap_or(Value::Null))?;
            }
        }
        Ok(())
    }

    // ========== Writes ==========

    /// Create a node within the transaction.
    pub fn create_node(&mut self, type_id: TypeId, attrs: Attributes) -> TransactionResult<NodeId> {
        self.ensure_writable("create node")?;
        let node_id = self.graph.create_node(type_id, attrs);
        self.undo.track_created_node(node_id);
        Ok(node_id)
    }

    /// Delete a node (and every edge touching it) within the transaction.
    pub fn delete_node(&mut self, node_id: NodeId) -> TransactionResult<()> {
        self.ensure_writable("delete node")?;
        let node = self
            .graph
            .get_node(node_id)
            .cloned()
            .ok_or(arbor_core::GraphError::NodeNotFound(node_id))?;
        let edges: Vec<Edge> = self
            .graph
            .edges_involving(node_id)
            .into_iter()
            .filter_map(|id| self.graph.get_edge(id).cloned())
            .collect();

        self.graph.delete_node(node_id)?;
        self.undo.track_deleted_node(node, edges);
        Ok(())
    }

    /// Write a node property within the transaction.
    pub fn set_node_attr(
        &mut self,
        node_id: NodeId,
        attr_name: &str,
        value: Value,
    ) -> TransactionResult<()> {
        self.ensure_writable("set node property")?;
        let previous = self.graph.set_node_attr(node_id, attr_name, value)?;
        self.undo
            .track_node_attr(node_id, attr_name.to_string(), previous);
        Ok(())
    }

    /// Remove a node property within the transaction.
    pub fn remove_node_attr(&mut self, node_id: NodeId, attr_name: &str) -> TransactionResult<()> {
        self.ensure_writable("remove node property")?;
        let previous = self.graph.remove_node_attr(node_id, attr_name)?;
        if previous.is_some() {
            self.undo
                .track_node_attr(node_id, attr_name.to_string(), previous);
        }
        Ok(())
    }

    /// Create a directed edge within the transaction.
    pub fn create_edge(
        &mut self,
        type_id: EdgeTypeId,
        source: NodeId,
        target: NodeId,
        attrs: Attributes,
    ) -> TransactionResult<EdgeId> {
        self.ensure_writable("create edge")?;
        let edge_id = self.graph.create_edge(type_id, source, target, attrs)?;
        self.undo.track_created_edge(edge_id);
        Ok(edge_id)
    }

    /// Delete an edge within the transaction.
    pub fn delete_edge(&mut self, edge_id: EdgeId) -> TransactionResult<()> {
        self.ensure_writable("delete edge")?;
        let edge = self
            .graph
            .get_edge(edge_id)
            .cloned()
            .ok_or(arbor_core::GraphError::EdgeNotFound(edge_id))?;
        self.graph.delete_edge(edge_id)?;
        self.undo.track_deleted_edge(edge);
        Ok(())
    }

    /// Write an edge property within the transaction.
    pub fn set_edge_attr(
        &mut self,
        edge_id: EdgeId,
        attr_name: &str,
        value: Value,
    ) -> TransactionResult<()> {
        self.ensure_writable("set edge property")?;
        let previous = self.graph.set_edge_attr(edge_id, attr_name, value)?;
        self.undo
            .track_edge_attr(edge_id, attr_name.to_string(), previous);
        Ok(())
    }

    // ========== Reads (Read-Your-Writes) ==========

    /// Get a node record.
    pub fn get_node(&self, node_id: NodeId) -> Option<&Node> {
        self.graph.get_node(node_id)
    }

    /// Get an edge record.
    pub fn get_edge(&self, edge_id: EdgeId) -> Option<&Edge> {
        self.graph.get_edge(edge_id)
    }

    // ========== Internal Helpers ==========

    fn ensure_active(&self) -> TransactionResult<()> {
        if self.state != TransactionState::Active {
            return Err(TransactionError::NoActiveTransaction);
        }
        Ok(())
    }

    fn ensure_writable(&self, operation: &str) -> TransactionResult<()> {
        self.ensure_active()?;
        if self.mode == TransactionMode::ReadOnly {
            return Err(TransactionError::read_only(operation));
        }
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.state == TransactionState::Active && !self.undo.is_empty() {
            warn!(changes = self.undo.len(), "transaction abandoned, rolling back");
            if let Err(e) = self.do_rollback() {
                warn!(error = %e, "rollback of abandoned transaction failed");
            }
        }
    }
}

/// Run `f` inside a fresh transaction: commit when it returns `Ok`,
/// roll back when it returns `Err`.
pub fn run_in_transaction<T, E, F>(graph: &mut Graph, f: F) -> Result<T, E>
where
    F: FnOnce(&mut Transaction<'_>) -> Result<T, E>,
    E: From<TransactionError>,
{
    let mut tx = Transaction::begin(graph);
    match f(&mut tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(e) => {
            tx.rollback()?;
            Err(e)
        }
    }
}
