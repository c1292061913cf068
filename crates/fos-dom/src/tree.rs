//! DOM Tree (arena-based allocation)
//!
//! Structural edits and attribute writes are reported to the attached
//! [`MutationObservers`] as they happen.

use crate::observer::{MutationObservers, MutationRecord};
use crate::{Node, NodeId};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node {0} not found")]
    NotFound(NodeId),

    #[error("Hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    observers: MutationObservers,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            observers: MutationObservers::new(),
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes ever allocated (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node exists from construction
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    /// Check if `id` is an element with the given tag
    pub fn is_element_named(&self, id: NodeId, tag: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.is(tag))
    }

    // === Attributes ===

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute. Every write is recorded, even when the value is unchanged.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let elem = self.node_mut(id)?.as_element_mut().ok_or(DomError::NotAnElement(id))?;
        let old = elem.set_attr(name, value.to_string());
        let record = MutationRecord::attribute(id, &name.to_ascii_lowercase(), old);
        self.record(record);
        Ok(())
    }

    /// Remove an attribute. Removing a missing attribute records nothing.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        let elem = self.node_mut(id)?.as_element_mut().ok_or(DomError::NotAnElement(id))?;
        if let Some(old) = elem.remove_attr(name) {
            let record = MutationRecord::attribute(id, &name.to_ascii_lowercase(), Some(old));
            self.record(record);
        }
        Ok(())
    }

    // === Structure ===

    /// Append `child` as the last child of `parent`.
    ///
    /// An attached child is moved: a removal is recorded on its old parent
    /// before the addition is recorded on the new one.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if !self.node(parent)?.is_container() {
            tracing::debug!("Rejected append of {} to non-container {}", child, parent);
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let child_node = self.node(child)?;
        if matches!(child_node.data, crate::NodeData::Document) || self.contains(child, parent) {
            tracing::debug!("Rejected append of {} into its own subtree at {}", child, parent);
            return Err(DomError::HierarchyRequest { parent, child });
        }

        let old_parent = child_node.parent;
        if old_parent.is_valid() {
            self.remove_child(old_parent, child)?;
        }

        let last = self.node(parent)?.last_child;
        {
            let node = self.node_mut(child)?;
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.node_mut(last)?.next_sibling = child;
        } else {
            self.node_mut(parent)?.first_child = child;
        }
        self.node_mut(parent)?.last_child = child;

        self.record(MutationRecord::child_list(parent, vec![child], Vec::new()));
        Ok(child)
    }

    /// Detach `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let node = self.node(child)?;
        if node.parent != parent {
            tracing::debug!("Rejected removal of {}: not a child of {}", child, parent);
            return Err(DomError::NotAChild { parent, child });
        }
        let (prev, next) = (node.prev_sibling, node.next_sibling);

        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = next;
        } else {
            self.node_mut(parent)?.first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next)?.prev_sibling = prev;
        } else {
            self.node_mut(parent)?.last_child = prev;
        }
        {
            let node = self.node_mut(child)?;
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }

        self.record(MutationRecord::child_list(parent, Vec::new(), vec![child]));
        Ok(child)
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(NodeId::is_valid)
    }

    /// Iterate over the children of a node
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Pre-order descendants of `id`, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let start = stack.len();
            stack.extend(self.children(current));
            stack[start..].reverse();
        }
        out
    }

    /// Descendant elements with the given tag, in document order
    pub fn elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.is_element_named(id, tag))
            .collect()
    }

    /// Inclusive ancestor chain, starting at `id`
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(node) = self.get(current) {
            chain.push(current);
            current = node.parent;
        }
        chain
    }

    /// Check if `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while let Some(n) = self.get(current) {
            if current == ancestor {
                return true;
            }
            current = n.parent;
        }
        false
    }

    /// Check if a node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    // === Observation ===

    pub fn observers(&self) -> &MutationObservers {
        &self.observers
    }

    pub fn observers_mut(&mut self) -> &mut MutationObservers {
        &mut self.observers
    }

    fn record(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let chain = self.ancestors(record.target);
        self.observers.notify(&record, &chain);
    }
}

/// Iterator over child node IDs
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        let node = self.tree.get(current)?;
        self.next = node.next_sibling;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MutationObserverInit, MutationType};

    fn observe_all(tree: &mut DomTree) -> crate::MutationObserverId {
        let id = tree.observers_mut().create();
        tree.observers_mut().observe(id, NodeId::ROOT, MutationObserverInit {
            child_list: true,
            attributes: true,
            subtree: true,
            attribute_old_value: true,
            ..Default::default()
        });
        id
    }

    #[test]
    fn test_append_and_children_order() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("a");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        assert_eq!(tree.children(div).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(tree.parent(a), Some(div));
        assert!(tree.is_connected(b));
    }

    #[test]
    fn test_remove_middle_child() {
        let mut tree = DomTree::new();
        let ids: Vec<_> = (0..3).map(|_| tree.create_element("span")).collect();
        for &id in &ids {
            tree.append_child(NodeId::ROOT, id).unwrap();
        }
        tree.remove_child(NodeId::ROOT, ids[1]).unwrap();

        assert_eq!(tree.children(NodeId::ROOT).collect::<Vec<_>>(), vec![ids[0], ids[2]]);
        assert!(!tree.is_connected(ids[1]));
        assert_eq!(
            tree.remove_child(NodeId::ROOT, ids[1]),
            Err(DomError::NotAChild { parent: NodeId::ROOT, child: ids[1] })
        );
    }

    #[test]
    fn test_hierarchy_request() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();

        assert!(matches!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        let text = tree.create_text("hi");
        assert!(matches!(
            tree.append_child(text, inner),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_descendants_document_order() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a1 = tree.create_element("a");
        let p = tree.create_element("p");
        let a2 = tree.create_element("a");
        let a3 = tree.create_element("a");
        tree.append_child(NodeId::ROOT, div).unwrap();
        tree.append_child(div, a1).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, a2).unwrap();
        tree.append_child(NodeId::ROOT, a3).unwrap();

        assert_eq!(tree.elements_by_tag_name(NodeId::ROOT, "a"), vec![a1, a2, a3]);
        assert_eq!(tree.elements_by_tag_name(p, "A"), vec![a2]);
    }

    #[test]
    fn test_move_records_removal_then_addition() {
        let mut tree = DomTree::new();
        let left = tree.create_element("div");
        let right = tree.create_element("div");
        let link = tree.create_element("a");
        tree.append_child(NodeId::ROOT, left).unwrap();
        tree.append_child(NodeId::ROOT, right).unwrap();
        tree.append_child(left, link).unwrap();

        let observer = observe_all(&mut tree);
        tree.append_child(right, link).unwrap();

        let records = tree.observers_mut().take_records(observer);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].target, left);
        assert_eq!(records[0].removed_nodes, vec![link]);
        assert_eq!(records[1].target, right);
        assert_eq!(records[1].added_nodes, vec![link]);
    }

    #[test]
    fn test_detached_mutations_not_observed() {
        let mut tree = DomTree::new();
        let observer = observe_all(&mut tree);
        let div = tree.create_element("div");
        let link = tree.create_element("a");
        tree.append_child(div, link).unwrap();
        tree.set_attribute(link, "href", "/x").unwrap();
        assert!(tree.observers_mut().take_records(observer).is_empty());

        tree.append_child(NodeId::ROOT, div).unwrap();
        tree.set_attribute(link, "href", "/y").unwrap();
        let records = tree.observers_mut().take_records(observer);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].mutation_type, MutationType::Attributes);
        assert_eq!(records[1].old_value.as_deref(), Some("/x"));
    }

    #[test]
    fn test_attribute_on_text_fails() {
        let mut tree = DomTree::new();
        let text = tree.create_text("plain");
        assert_eq!(
            tree.set_attribute(text, "href", "/"),
            Err(DomError::NotAnElement(text))
        );
    }
}
