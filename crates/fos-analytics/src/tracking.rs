//! Tracked anchor set
//!
//! Anchors wired with `click` and `auxclick` listeners, keyed by element
//! identity. Two anchors with the same `href` are separate entries.

use fos_dom::{MouseEvent, MouseEventType, NodeId};
use fos_window::{ListenerId, MouseListener, Window};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Decides whether an anchor belongs in the set
pub type IncludeAnchor = Rc<dyn Fn(&Window, NodeId) -> bool>;

/// Click handler shared by every tracked anchor; receives the anchor it fired on
pub type ClickHandler = Rc<dyn Fn(&Window, NodeId, &mut MouseEvent)>;

const TRACKED_EVENTS: [MouseEventType; 2] = [MouseEventType::Click, MouseEventType::AuxClick];

/// Live set of tracked anchors
pub struct TrackedAnchors {
    include: IncludeAnchor,
    handler: ClickHandler,
    tracked: RefCell<BTreeMap<NodeId, Vec<ListenerId>>>,
}

impl std::fmt::Debug for TrackedAnchors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedAnchors")
            .field("tracked", &self.tracked.borrow().keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl TrackedAnchors {
    pub fn new(include: IncludeAnchor, handler: ClickHandler) -> Self {
        Self {
            include,
            handler,
            tracked: RefCell::new(BTreeMap::new()),
        }
    }

    /// Track `node` if it is a qualifying anchor, otherwise every qualifying
    /// anchor below it
    pub fn add_node(&self, window: &Window, node: NodeId) {
        if window.document().tree().is_element_named(node, "a") {
            if (self.include)(window, node) {
                self.track(window, node);
            }
            return;
        }
        let anchors = window.document().anchors(node);
        for anchor in anchors {
            self.add_node(window, anchor);
        }
    }

    /// Untrack `node` if it is an anchor, otherwise every anchor below it.
    /// Untracked anchors are skipped.
    pub fn remove_node(&self, window: &Window, node: NodeId) {
        if window.document().tree().is_element_named(node, "a") {
            self.untrack(window, node);
            return;
        }
        let anchors = window.document().anchors(node);
        for anchor in anchors {
            self.untrack(window, anchor);
        }
    }

    fn track(&self, window: &Window, anchor: NodeId) {
        if self.contains(anchor) {
            return;
        }
        let handler = self.handler.clone();
        let listener: MouseListener = Rc::new(move |w: &Window, event: &mut MouseEvent| {
            handler(w, anchor, event)
        });
        let ids = TRACKED_EVENTS
            .iter()
            .map(|&event_type| window.add_event_listener(anchor, event_type, listener.clone()))
            .collect();

        self.tracked.borrow_mut().insert(anchor, ids);
        tracing::debug!("Tracking anchor {}", anchor);
    }

    fn untrack(&self, window: &Window, anchor: NodeId) {
        let Some(ids) = self.tracked.borrow_mut().remove(&anchor) else {
            return;
        };
        for id in ids {
            window.remove_event_listener(id);
        }
        tracing::debug!("Untracked anchor {}", anchor);
    }

    /// Untrack everything
    pub fn clear(&self, window: &Window) {
        let tracked = std::mem::take(&mut *self.tracked.borrow_mut());
        for id in tracked.into_values().flatten() {
            window.remove_event_listener(id);
        }
    }

    pub fn contains(&self, anchor: NodeId) -> bool {
        self.tracked.borrow().contains_key(&anchor)
    }

    /// Tracked anchors in node order
    pub fn anchors(&self) -> Vec<NodeId> {
        self.tracked.borrow().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.tracked.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.borrow().is_empty()
    }
}
