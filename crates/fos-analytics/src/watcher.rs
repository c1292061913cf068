//! Mutation Watcher
//!
//! Keeps a [`TrackedAnchors`] set in sync with the DOM under a root.

use crate::TrackedAnchors;
use fos_dom::{MutationObserverId, MutationObserverInit, MutationRecord, MutationType, NodeId};
use fos_window::Window;
use std::cell::Cell;
use std::rc::Rc;

/// Structural changes and `href` edits anywhere under the root
pub fn observer_init() -> MutationObserverInit {
    MutationObserverInit {
        subtree: true,
        child_list: true,
        attributes: true,
        attribute_filter: Some(vec!["href".to_string()]),
        ..Default::default()
    }
}

/// Apply one mutation record to the set
pub fn apply_record(anchors: &TrackedAnchors, window: &Window, record: &MutationRecord) {
    match record.mutation_type {
        MutationType::Attributes => {
            // href changed: re-evaluate from scratch
            anchors.remove_node(window, record.target);
            anchors.add_node(window, record.target);
        }
        MutationType::ChildList => {
            for &node in &record.added_nodes {
                anchors.add_node(window, node);
            }
            for &node in &record.removed_nodes {
                anchors.remove_node(window, node);
            }
        }
        MutationType::CharacterData => {}
    }
}

/// Mutation observer driving a tracked anchor set
#[derive(Debug, Default)]
pub struct MutationWatcher {
    observer: Cell<Option<MutationObserverId>>,
}

impl MutationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `root`. Batches are applied in delivery order, each
    /// record fully before the next.
    pub fn watch(&self, window: &Window, root: NodeId, anchors: Rc<TrackedAnchors>) {
        let observer = window.create_mutation_observer(Rc::new(move |w: &Window, records: Vec<MutationRecord>| {
            for record in &records {
                apply_record(&anchors, w, record);
            }
        }));
        window.observe(observer, root, observer_init());

        if let Some(previous) = self.observer.replace(Some(observer)) {
            tracing::warn!("Watcher started twice, observer {:?} stays connected", previous);
        }
    }

    /// Stop observing. Safe to call when not watching.
    pub fn disconnect(&self, window: &Window) {
        if let Some(observer) = self.observer.take() {
            window.disconnect(observer);
        }
    }

    pub fn is_watching(&self) -> bool {
        self.observer.get().is_some()
    }
}
