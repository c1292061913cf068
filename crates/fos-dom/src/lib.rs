//! fOS DOM - Document Object Model
//!
//! Arena-based DOM tree backing an fOS page.
//!
//! Node slots are never reused, so a [`NodeId`] is a stable element
//! identity for the lifetime of the tree. Two anchors with the same `href`
//! are always two different ids.

mod node;
mod tree;
mod document;
mod anchor;
mod observer;
mod events;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, DomError, DomResult, Children};
pub use document::Document;
pub use anchor::Anchor;
pub use observer::{
    MutationObserverId, MutationObserverInit, MutationObservers, MutationRecord, MutationType,
};
pub use events::{MouseButton, MouseEvent, MouseEventType};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID points at a node
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
