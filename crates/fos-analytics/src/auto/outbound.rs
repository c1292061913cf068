//! Automatic outbound link tracking

use super::links::{LinkKind, LinkTracking};
use crate::{EventOptions, Tracker};
use fos_dom::NodeId;
use fos_window::Window;

/// Reports clicks on links whose host differs from the page's
#[derive(Debug)]
pub struct AutoOutboundTracking {
    links: LinkTracking,
}

impl AutoOutboundTracking {
    pub fn new(tracker: &Tracker, options: EventOptions) -> Self {
        Self {
            links: LinkTracking::new(tracker, LinkKind::Outbound, options),
        }
    }

    /// Track outbound links anywhere in the document
    pub fn install(&self, window: &Window) {
        let root = window.document().root();
        self.install_under(window, root);
    }

    /// Track outbound links under `root` only
    pub fn install_under(&self, window: &Window, root: NodeId) {
        self.links.install(window, root);
    }

    /// Detach every listener and stop observing. Safe to repeat.
    pub fn cleanup(&self, window: &Window) {
        self.links.cleanup(window);
    }

    /// Affects every later report. `props` are merged under the `url` prop.
    pub fn set_event_options(&self, options: EventOptions) {
        self.links.set_event_options(options);
    }

    pub fn is_tracked(&self, anchor: NodeId) -> bool {
        self.links.anchors().contains(anchor)
    }

    /// Currently tracked anchors
    pub fn tracked(&self) -> Vec<NodeId> {
        self.links.anchors().anchors()
    }

    pub fn is_observing(&self) -> bool {
        self.links.is_watching()
    }
}
