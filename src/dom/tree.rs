//! Tree operations: create, append, insert, replace, detach, destroy, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};
use crate::event::handler::ListenerEntry;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// Errors from tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("cannot insert {child:?} under {parent:?}: {reason}")]
    HierarchyRequest {
        parent: NodeId,
        child: NodeId,
        reason: &'static str,
    },
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
}

/// The document tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
/// Nodes may exist without a parent (freshly built or detached subtrees); only
/// nodes whose ancestor chain ends at a document node are *connected*.
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    pub(crate) listeners: SecondaryMap<NodeId, Vec<ListenerEntry>>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty arena with no document.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            listeners: SecondaryMap::new(),
            root: None,
        }
    }

    /// Create an arena holding a single document, which becomes the root.
    pub fn with_document() -> Self {
        let mut dom = Self::new();
        dom.create_document();
        dom
    }

    /// Insert a new document node.
    ///
    /// If no root has been set yet, this document becomes the root.
    pub fn create_document(&mut self) -> NodeId {
        let id = self.create(NodeData::document());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a detached node (no parent).
    pub fn create(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already attached somewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference`, or last when
    /// `reference` is `None`. Moves `child` if it is already attached.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.check_insertable(parent, child)?;
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
            if reference == child {
                return Ok(());
            }
        }

        self.detach(child);
        let siblings = self
            .children
            .get_mut(parent)
            .ok_or(DomError::NodeNotFound(parent))?;
        let index = reference
            .and_then(|r| siblings.iter().position(|&s| s == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.parent.insert(child, parent);
        Ok(())
    }

    /// Put `new` in the position of `old`. `old` is detached, not destroyed.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> Result<(), DomError> {
        if old == new {
            return Ok(());
        }
        let parent = self.parent(old).ok_or(DomError::NodeNotFound(old))?;
        self.check_insertable(parent, new)?;

        self.detach(new);
        let siblings = self
            .children
            .get_mut(parent)
            .ok_or(DomError::NodeNotFound(parent))?;
        let index = siblings
            .iter()
            .position(|&s| s == old)
            .ok_or(DomError::NotAChild { parent, child: old })?;
        siblings[index] = new;
        self.parent.remove(old);
        self.parent.insert(new, parent);
        Ok(())
    }

    /// Detach a node from its parent, keeping its subtree intact.
    ///
    /// Returns the former parent.
    pub fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent_id = self.parent.remove(id)?;
        if let Some(siblings) = self.children.get_mut(parent_id) {
            siblings.retain(|&child| child != id);
        }
        Some(parent_id)
    }

    /// Destroy a node and all its descendants.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        self.detach(id);

        if self.root == Some(id) {
            self.root = None;
        }

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            self.listeners.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }

        removed_root_data
    }

    /// Destroy every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let kids = self.children(id).to_vec();
        for child in kids {
            self.remove(child);
        }
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// The sibling immediately before `id`.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&s| s == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// The sibling immediately after `id`.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&s| s == id)?;
        siblings.get(index + 1).copied()
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the topmost ancestor.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// The document `id` belongs to, if it is connected.
    pub fn document_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let data = self.nodes.get(current)?;
            if data.is_document() {
                return Some(current);
            }
            current = self.parent(current)?;
        }
    }

    /// Whether `id` exists and is part of a live document tree.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.document_of(id).is_some()
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// Set an attribute on an element.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let data = self.nodes.get_mut(id).ok_or(DomError::NodeNotFound(id))?;
        if data.set_attribute(name, value.into()) {
            Ok(())
        } else {
            Err(DomError::NotAnElement(id))
        }
    }

    /// Remove an attribute from an element. Missing attributes are not an error.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        let data = self.nodes.get_mut(id).ok_or(DomError::NodeNotFound(id))?;
        if !data.is_element() {
            return Err(DomError::NotAnElement(id));
        }
        data.remove_attribute(name);
        Ok(())
    }

    /// Read an attribute from an element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(id)?.attribute(name)
    }

    /// The default document root, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Explicitly set the root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Number of nodes in the arena, connected or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the arena contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            let kids = self.children(current);
            for &child in kids.iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_data = self
            .nodes
            .get(parent)
            .ok_or(DomError::NodeNotFound(parent))?;
        let child_data = self.nodes.get(child).ok_or(DomError::NodeNotFound(child))?;
        if !(parent_data.is_element() || parent_data.is_document()) {
            return Err(DomError::HierarchyRequest {
                parent,
                child,
                reason: "parent cannot have children",
            });
        }
        if child_data.is_document() {
            return Err(DomError::HierarchyRequest {
                parent,
                child,
                reason: "documents cannot be nested",
            });
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(DomError::HierarchyRequest {
                parent,
                child,
                reason: "child is an ancestor of parent",
            });
        }
        Ok(())
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a small test tree:
    /// ```text
    ///      document
    ///         |
    ///       body
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Dom, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::with_document();
        let doc = dom.root().unwrap();
        let body = dom.create(NodeData::element("body"));
        let a = dom.create(NodeData::element("div").with_attribute("id", "a"));
        let b = dom.create(NodeData::element("div").with_attribute("id", "b"));
        let c = dom.create(NodeData::element("span"));
        let d = dom.create(NodeData::text("d"));
        dom.append_child(doc, body).unwrap();
        dom.append_child(body, a).unwrap();
        dom.append_child(body, b).unwrap();
        dom.append_child(a, c).unwrap();
        dom.append_child(a, d).unwrap();
        (dom, body, a, b, c, d)
    }

    #[test]
    fn with_document_sets_root() {
        let dom = Dom::with_document();
        let root = dom.root().unwrap();
        assert!(dom.get(root).unwrap().is_document());
        assert!(dom.is_connected(root));
    }

    #[test]
    fn second_document_does_not_change_root() {
        let mut dom = Dom::with_document();
        let first = dom.root().unwrap();
        let second = dom.create_document();
        assert_ne!(first, second);
        assert_eq!(dom.root(), Some(first));
        assert!(dom.is_connected(second));
    }

    #[test]
    fn append_child_parent_relationship() {
        let (dom, body, a, _b, c, _d) = build_tree();
        assert_eq!(dom.parent(a), Some(body));
        assert_eq!(dom.parent(c), Some(a));
        assert_eq!(dom.children(body).len(), 2);
    }

    #[test]
    fn insert_before_reference() {
        let (mut dom, body, a, b, ..) = build_tree();
        let x = dom.create(NodeData::element("p"));
        dom.insert_before(body, x, Some(b)).unwrap();
        assert_eq!(dom.children(body), &[a, x, b]);
    }

    #[test]
    fn insert_before_foreign_reference_fails() {
        let (mut dom, body, _a, _b, c, _d) = build_tree();
        let x = dom.create(NodeData::element("p"));
        let err = dom.insert_before(body, x, Some(c)).unwrap_err();
        assert_eq!(err, DomError::NotAChild { parent: body, child: c });
    }

    #[test]
    fn append_moves_attached_node() {
        let (mut dom, body, a, b, c, d) = build_tree();
        dom.append_child(b, c).unwrap();
        assert_eq!(dom.children(a), &[d]);
        assert_eq!(dom.children(b), &[c]);
        assert_eq!(dom.ancestors(c), vec![b, body, dom.root().unwrap()]);
    }

    #[test]
    fn append_rejects_cycles() {
        let (mut dom, _body, a, _b, c, _d) = build_tree();
        let err = dom.append_child(c, a).unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequest { .. }));
    }

    #[test]
    fn append_rejects_text_parent() {
        let (mut dom, _body, _a, _b, _c, d) = build_tree();
        let x = dom.create(NodeData::text("x"));
        assert!(matches!(
            dom.append_child(d, x),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn replace_child_swaps_in_place() {
        let (mut dom, _body, a, _b, c, d) = build_tree();
        let x = dom.create(NodeData::text("x"));
        dom.replace_child(c, x).unwrap();
        assert_eq!(dom.children(a), &[x, d]);
        assert_eq!(dom.parent(c), None);
        assert!(dom.contains(c));
        assert!(!dom.is_connected(c));
    }

    #[test]
    fn replace_detached_fails() {
        let mut dom = Dom::with_document();
        let x = dom.create(NodeData::text("x"));
        let y = dom.create(NodeData::text("y"));
        assert_eq!(dom.replace_child(x, y), Err(DomError::NodeNotFound(x)));
    }

    #[test]
    fn siblings() {
        let (dom, _body, a, b, c, d) = build_tree();
        assert_eq!(dom.previous_sibling(b), Some(a));
        assert_eq!(dom.previous_sibling(a), None);
        assert_eq!(dom.next_sibling(c), Some(d));
        assert_eq!(dom.next_sibling(d), None);
    }

    #[test]
    fn detach_disconnects_subtree() {
        let (mut dom, body, a, _b, c, _d) = build_tree();
        assert_eq!(dom.detach(a), Some(body));
        assert!(!dom.is_connected(a));
        assert!(!dom.is_connected(c));
        assert!(dom.contains(c));
    }

    #[test]
    fn remove_subtree() {
        let (mut dom, body, a, b, c, d) = build_tree();
        let before = dom.len();
        dom.remove(a);
        assert!(!dom.contains(a));
        assert!(!dom.contains(c));
        assert!(!dom.contains(d));
        assert!(dom.contains(b));
        assert_eq!(dom.children(body), &[b]);
        assert_eq!(dom.len(), before - 3);
    }

    #[test]
    fn removed_node_is_not_connected() {
        let (mut dom, _body, _a, _b, c, _d) = build_tree();
        dom.remove(c);
        assert!(!dom.is_connected(c));
        assert!(dom.remove(c).is_none());
    }

    #[test]
    fn clear_children() {
        let (mut dom, _body, a, _b, c, d) = build_tree();
        dom.clear_children(a);
        assert!(dom.children(a).is_empty());
        assert!(!dom.contains(c));
        assert!(!dom.contains(d));
    }

    #[test]
    fn attributes_through_dom() {
        let (mut dom, _body, a, _b, _c, d) = build_tree();
        dom.set_attribute(a, "title", "hello").unwrap();
        assert_eq!(dom.attribute(a, "title"), Some("hello"));
        dom.remove_attribute(a, "title").unwrap();
        assert_eq!(dom.attribute(a, "title"), None);
        assert_eq!(
            dom.set_attribute(d, "title", "x"),
            Err(DomError::NotAnElement(d))
        );
    }

    #[test]
    fn walk_depth_first() {
        let (dom, body, a, b, c, d) = build_tree();
        assert_eq!(dom.walk_depth_first(body), vec![body, a, c, d, b]);
    }

    #[test]
    fn default_impl() {
        let dom = Dom::default();
        assert!(dom.is_empty());
        assert_eq!(dom.root(), None);
    }
}
