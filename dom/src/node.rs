//! The document node API.
//!
//! Every mutating call validates permissions, document membership and
//! hierarchy rules before touching the store, so a rejected call leaves
//! the tree unchanged.

use crate::error::{
    HIERARCHY_ANCESTOR_MESSAGE, HIERARCHY_DOCUMENT_MESSAGE, HIERARCHY_ELEMENT_MESSAGE,
    HIERARCHY_SAME_NODE_MESSAGE, HIERARCHY_TEXT_MESSAGE, NOT_SUPPORTED_ADOPT_DOC_MESSAGE,
    NOT_SUPPORTED_CLONE_MESSAGE, NOT_SUPPORTED_IMPORT_DOC_MESSAGE, NOT_SUPPORTED_MESSAGE,
    NOT_SUPPORTED_RENAME_MESSAGE,
};
use crate::schema::{props, NodeKind, RelType};
use crate::security::{owner_of, Permission, SecurityContext};
use crate::tree::TreeManager;
use crate::view::{AttachmentState, DomView};
use crate::{DomError, DomResult};
use arbor_core::{attrs, Attributes, NodeId, Value};
use arbor_transaction::Transaction;
use tracing::debug;

/// Tag a Document accepts as its single child.
pub const DOCUMENT_ELEMENT_TAG: &str = "html";

/// Document operations performed by one caller inside one transaction.
pub struct Dom<'t, 'g> {
    tx: &'t mut Transaction<'g>,
    security: SecurityContext,
    tree: TreeManager,
}

impl<'t, 'g> Dom<'t, 'g> {
    pub fn new(tx: &'t mut Transaction<'g>, security: SecurityContext) -> Self {
        Self {
            tx,
            security,
            tree: TreeManager::default(),
        }
    }

    /// Use a tree manager over custom relationship types.
    pub fn with_tree_manager(mut self, tree: TreeManager) -> Self {
        self.tree = tree;
        self
    }

    pub fn security(&self) -> SecurityContext {
        self.security
    }

    /// Unchecked reads over the current transaction state.
    pub fn view(&self) -> DomView<'_> {
        DomView::new(self.tx.graph(), self.tree)
    }

    // ========== Validation ==========

    fn check_access(&self, node: NodeId, permission: Permission) -> DomResult<()> {
        if self.security.is_allowed(self.tx.graph(), node, permission) {
            return Ok(());
        }
        debug!(%node, ?permission, "access denied");
        Err(match permission {
            Permission::Read => DomError::invalid_access(),
            Permission::Write => DomError::no_modification_allowed(),
        })
    }

    fn check_read_access(&self, node: NodeId) -> DomResult<()> {
        self.check_access(node, Permission::Read)
    }

    fn check_write_access(&self, node: NodeId) -> DomResult<()> {
        self.check_access(node, Permission::Write)
    }

    /// Both operands must belong to the same Document. A side that has
    /// not been adopted yet is accepted and adopted on insertion.
    fn check_same_document(&self, node: NodeId, other: NodeId) -> DomResult<()> {
        let view = self.view();
        match (view.owner_document(node), view.owner_document(other)) {
            (Some(a), Some(b)) if a != b => Err(DomError::wrong_document()),
            _ => Ok(()),
        }
    }

    /// Every node of the incoming subtree must belong to the parent's
    /// document or to none. Fragment children are covered as descendants.
    fn check_same_document_subtree(&self, parent: NodeId, node: NodeId) -> DomResult<()> {
        let view = self.view();
        let Some(document) = view.owner_document(parent) else {
            return Ok(());
        };
        let foreign = std::iter::once(node)
            .chain(view.descendants(node))
            .filter_map(|n| view.owner_document(n))
            .any(|owner| owner != document);
        if foreign {
            Err(DomError::wrong_document())
        } else {
            Ok(())
        }
    }

    /// `other` must be a tree node and must not be `parent` or one of its
    /// ancestors.
    fn check_hierarchy(&self, parent: NodeId, other: NodeId) -> DomResult<()> {
        let view = self.view();
        view.kind(other)?;
        if parent == other {
            return Err(DomError::HierarchyRequestSelf(
                HIERARCHY_SAME_NODE_MESSAGE.to_string(),
            ));
        }
        if view.ancestors(parent).contains(&other) {
            return Err(DomError::HierarchyRequestAncestor(
                HIERARCHY_ANCESTOR_MESSAGE.to_string(),
            ));
        }
        Ok(())
    }

    /// Kind rules: text nodes hold nothing, documents are never children,
    /// and a document holds exactly one `html` element.
    fn check_accepts(
        &self,
        parent: NodeId,
        child: NodeId,
        replacing: Option<NodeId>,
    ) -> DomResult<()> {
        let view = self.view();
        let parent_kind = view.kind(parent)?;
        if !parent_kind.accepts_children() {
            return Err(DomError::HierarchyRequest(HIERARCHY_TEXT_MESSAGE.to_string()));
        }

        let incoming = match view.kind(child)? {
            NodeKind::Document => {
                return Err(DomError::not_supported(NOT_SUPPORTED_IMPORT_DOC_MESSAGE))
            }
            NodeKind::Fragment => view.child_nodes(child),
            _ => vec![child],
        };

        if parent_kind != NodeKind::Document {
            return Ok(());
        }
        for node in &incoming {
            let is_html = view.kind(*node)? == NodeKind::Element
                && view.tag_name(*node) == Some(DOCUMENT_ELEMENT_TAG);
            if !is_html {
                return Err(DomError::HierarchyRequestWrongRoot(
                    HIERARCHY_ELEMENT_MESSAGE.to_string(),
                ));
            }
        }
        let remaining = view
            .child_nodes(parent)
            .into_iter()
            .filter(|c| Some(*c) != replacing && !incoming.contains(c))
            .count();
        if remaining + incoming.len() > 1 {
            return Err(DomError::HierarchyRequestWrongRoot(
                HIERARCHY_DOCUMENT_MESSAGE.to_string(),
            ));
        }
        Ok(())
    }

    /// Documents are never accepted as children.
    fn check_insertable(&self, node: NodeId) -> DomResult<()> {
        match self.view().kind(node)? {
            NodeKind::Document => Err(DomError::not_supported(NOT_SUPPORTED_IMPORT_DOC_MESSAGE)),
            _ => Ok(()),
        }
    }

    fn check_is_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.tree.is_child_of(self.tx.graph(), parent, child) {
            Ok(())
        } else {
            Err(DomError::not_found_child())
        }
    }

    // ========== Creation ==========

    fn create_tree_node(
        &mut self,
        kind: NodeKind,
        attributes: Attributes,
        document: Option<NodeId>,
    ) -> DomResult<NodeId> {
        if let Some(document) = document {
            if self.view().kind(document)? != NodeKind::Document {
                return Err(DomError::not_supported(NOT_SUPPORTED_MESSAGE));
            }
        }
        let node = self.tx.create_node(kind.type_id(), attributes)?;
        if let Some(principal) = self.security.principal() {
            self.tx
                .create_edge(RelType::Owns.edge_type_id(), principal, node, attrs!())?;
        }
        if let Some(document) = document {
            self.tx
                .create_edge(RelType::Page.edge_type_id(), node, document, attrs!())?;
        }
        debug!(%node, %kind, "created node");
        Ok(node)
    }

    pub fn create_document(&mut self, name: &str) -> DomResult<NodeId> {
        self.create_tree_node(NodeKind::Document, attrs! { props::NAME => name }, None)
    }

    pub fn create_element(&mut self, document: Option<NodeId>, tag: &str) -> DomResult<NodeId> {
        self.create_tree_node(NodeKind::Element, attrs! { props::TAG => tag }, document)
    }

    pub fn create_text_node(&mut self, document: Option<NodeId>, text: &str) -> DomResult<NodeId> {
        self.create_tree_node(NodeKind::Text, attrs! { props::CONTENT => text }, document)
    }

    pub fn create_fragment(&mut self, document: Option<NodeId>) -> DomResult<NodeId> {
        self.create_tree_node(NodeKind::Fragment, attrs!(), document)
    }

    // ========== Ownership ==========

    fn set_owner_document(&mut self, node: NodeId, document: NodeId) -> DomResult<()> {
        let page = RelType::Page.edge_type_id();
        for edge in self.tx.graph().edges_from(node, Some(page)) {
            self.tx.delete_edge(edge)?;
        }
        self.tx.create_edge(page, node, document, attrs!())?;
        Ok(())
    }

    /// Reassign `node` and its whole subtree to `document`.
    pub fn adopt(&mut self, node: NodeId, document: NodeId) -> DomResult<NodeId> {
        let view = self.view();
        if view.kind(document)? != NodeKind::Document {
            return Err(DomError::not_supported(NOT_SUPPORTED_MESSAGE));
        }
        if view.kind(node)? == NodeKind::Document {
            return Err(DomError::not_supported(NOT_SUPPORTED_ADOPT_DOC_MESSAGE));
        }
        self.check_write_access(node)?;

        let subtree: Vec<NodeId> = std::iter::once(node).chain(view.descendants(node)).collect();
        debug!(%node, %document, nodes = subtree.len(), "adopting subtree");
        for n in subtree {
            self.set_owner_document(n, document)?;
        }
        Ok(node)
    }

    /// Give every node of the freshly attached subtrees the parent's
    /// document.
    fn adopt_attached(&mut self, parent: NodeId, attached: &[NodeId]) -> DomResult<()> {
        let view = self.view();
        let Some(document) = view.owner_document(parent) else {
            return Ok(());
        };
        let stray: Vec<NodeId> = attached
            .iter()
            .flat_map(|node| std::iter::once(*node).chain(view.descendants(*node)))
            .filter(|n| view.owner_document(*n) != Some(document))
            .collect();
        if !stray.is_empty() {
            debug!(%parent, %document, nodes = stray.len(), "adopting attached nodes");
        }
        for node in stray {
            self.set_owner_document(node, document)?;
        }
        Ok(())
    }

    // ========== Structural Mutation ==========

    /// Append `new_child` to `parent`. A fragment contributes its children.
    pub fn append_child(&mut self, parent: NodeId, new_child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, new_child, None)
    }

    /// Insert `new_child` before `ref_child`, or append when it is None.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.check_write_access(parent)?;
        self.check_insertable(new_child)?;
        self.check_same_document_subtree(parent, new_child)?;
        self.check_hierarchy(parent, new_child)?;
        if let Some(reference) = ref_child {
            self.check_same_document(parent, reference)?;
            self.check_hierarchy(parent, reference)?;
            self.check_is_child(parent, reference)?;
        }
        self.check_accepts(parent, new_child, None)?;

        debug!(%parent, child = %new_child, reference = ?ref_child, "insert before");
        let attached = if self.view().kind(new_child)? == NodeKind::Fragment {
            self.tree
                .transfer_children(self.tx, new_child, parent, ref_child)?
        } else {
            self.tree.insert_before(self.tx, parent, new_child, ref_child)?;
            vec![new_child]
        };
        self.adopt_attached(parent, &attached)?;
        Ok(new_child)
    }

    /// Put `new_child` where `old_child` is and detach `old_child`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId> {
        self.check_write_access(parent)?;
        self.check_insertable(new_child)?;
        self.check_same_document_subtree(parent, new_child)?;
        self.check_same_document(parent, old_child)?;
        self.check_hierarchy(parent, new_child)?;
        self.check_hierarchy(parent, old_child)?;
        self.check_is_child(parent, old_child)?;
        self.check_accepts(parent, new_child, Some(old_child))?;

        debug!(%parent, new = %new_child, old = %old_child, "replace child");
        let attached = if self.view().kind(new_child)? == NodeKind::Fragment {
            let moved = self
                .tree
                .transfer_children(self.tx, new_child, parent, Some(old_child))?;
            self.tree.remove_child(self.tx, parent, old_child)?;
            moved
        } else {
            self.tree.replace_child(self.tx, parent, new_child, old_child)?;
            vec![new_child]
        };
        self.adopt_attached(parent, &attached)?;
        Ok(old_child)
    }

    /// Detach `old_child` from `parent`. The node and its subtree survive.
    pub fn remove_child(&mut self, parent: NodeId, old_child: NodeId) -> DomResult<NodeId> {
        self.check_write_access(parent)?;
        self.check_same_document(parent, old_child)?;
        self.check_is_child(parent, old_child)?;

        debug!(%parent, child = %old_child, "remove child");
        self.tree.remove_child(self.tx, parent, old_child)?;
        Ok(old_child)
    }

    /// Merge each run of adjacent text children into one text node,
    /// recursing through the subtree.
    pub fn normalize(&mut self, node: NodeId) -> DomResult<()> {
        let mut current = self.view().first_child(node);
        while let Some(child) = current {
            let next = self.view().next_sibling(child);
            let merge = next.and_then(|next| {
                let view = self.view();
                let first = view.node_value(child)?;
                let second = view.node_value(next)?;
                Some((next, format!("{}{}", first, second)))
            });

            let Some((next, text)) = merge else {
                self.normalize(child)?;
                current = next;
                continue;
            };
            let document = self.view().owner_document(node);
            let merged = self.create_text_node(document, &text)?;
            self.remove_child(node, child)?;
            self.insert_before(node, merged, Some(next))?;
            self.remove_child(node, next)?;
            debug!(%node, %merged, "merged adjacent text nodes");
            current = Some(merged);
        }
        Ok(())
    }

    /// Delete `node` and its subtree from the store.
    pub fn delete_node(&mut self, node: NodeId) -> DomResult<()> {
        self.check_write_access(node)?;
        if let Some(parent) = self.view().parent_node(node) {
            self.tree.remove_child(self.tx, parent, node)?;
        }
        let mut doomed = self.view().descendants(node);
        doomed.push(node);
        debug!(%node, nodes = doomed.len(), "deleting subtree");
        for n in doomed.into_iter().rev() {
            self.tx.delete_node(n)?;
        }
        Ok(())
    }

    // ========== Reads ==========

    /// Children in list order. Requires read access on `node`.
    pub fn child_nodes(&self, node: NodeId) -> DomResult<Vec<NodeId>> {
        self.check_read_access(node)?;
        Ok(self.view().child_nodes(node))
    }

    pub fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.view().parent_node(node)
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.view().first_child(node)
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.view().last_child(node)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.view().next_sibling(node)
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.view().previous_sibling(node)
    }

    pub fn owner_document(&self, node: NodeId) -> Option<NodeId> {
        self.view().owner_document(node)
    }

    pub fn attachment_state(&self, node: NodeId) -> AttachmentState {
        self.view().attachment_state(node)
    }

    pub fn text_content(&self, node: NodeId) -> DomResult<String> {
        self.check_read_access(node)?;
        Ok(self.view().text_content(node))
    }

    pub fn elements_by_tag_name(&self, node: NodeId, tag: &str) -> DomResult<Vec<NodeId>> {
        self.check_read_access(node)?;
        Ok(self.view().elements_by_tag_name(node, tag))
    }

    pub fn get_property(&self, node: NodeId, key: &str) -> DomResult<Option<Value>> {
        self.check_read_access(node)?;
        Ok(self.view().get_property(node, key).cloned())
    }

    pub fn set_property(&mut self, node: NodeId, key: &str, value: Value) -> DomResult<()> {
        self.check_write_access(node)?;
        self.tx.set_node_attr(node, key, value)?;
        Ok(())
    }

    /// Link `node` to `target` over the explicit link relationship,
    /// replacing any previous link.
    pub fn set_link(&mut self, node: NodeId, target: NodeId) -> DomResult<()> {
        self.check_write_access(node)?;
        let link = RelType::Link.edge_type_id();
        for edge in self.tx.graph().edges_from(node, Some(link)) {
            self.tx.delete_edge(edge)?;
        }
        self.tx.create_edge(link, node, target, attrs!())?;
        Ok(())
    }

    /// The principal owning `node`.
    pub fn owner(&self, node: NodeId) -> Option<NodeId> {
        owner_of(self.tx.graph(), node)
    }

    pub fn is_same_node(&self, a: NodeId, b: NodeId) -> bool {
        self.view().is_same_node(a, b)
    }

    pub fn is_equal_node(&self, a: NodeId, b: NodeId) -> bool {
        self.view().is_equal_node(a, b)
    }

    // ========== Unsupported ==========

    pub fn clone_node(&mut self, _node: NodeId, _deep: bool) -> DomResult<NodeId> {
        Err(DomError::not_supported(NOT_SUPPORTED_CLONE_MESSAGE))
    }

    pub fn rename_node(&mut self, _node: NodeId, _name: &str) -> DomResult<NodeId> {
        Err(DomError::not_supported(NOT_SUPPORTED_RENAME_MESSAGE))
    }
}
