//! Link click tracking shared by the outbound and download facades

use super::OptionsHolder;
use crate::{
    ClickHandler, EventCallback, EventOptions, IncludeAnchor, MutationWatcher, PropValue, Tracker,
    TrackedAnchors, is_download_target, is_outbound_link, is_trackable_click, open_link,
    should_follow_link,
};
use fos_dom::{Anchor, MouseEvent, NodeId};
use fos_window::Window;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Navigation fallback when the report never calls back
pub(crate) const FOLLOW_LINK_TIMEOUT: Duration = Duration::from_millis(1000);

/// Which links a facade tracks
#[derive(Debug, Clone)]
pub(crate) enum LinkKind {
    Outbound,
    Download { file_types: Rc<[String]> },
}

impl LinkKind {
    fn event_name(&self) -> &'static str {
        match self {
            Self::Outbound => crate::OUTBOUND_LINK_EVENT,
            Self::Download { .. } => crate::FILE_DOWNLOAD_EVENT,
        }
    }

    /// Tracking-time membership
    fn includes(&self, link: &Anchor<'_>, current_host: &str) -> bool {
        match self {
            Self::Outbound => is_outbound_link(link, current_host),
            // Files on other hosts are outbound links
            Self::Download { .. } => link.host() == current_host,
        }
    }

    /// Click-time check; the `url` prop of a reportable click
    fn url_prop(&self, link: &Anchor<'_>, current_host: &str) -> Option<String> {
        match self {
            Self::Outbound => is_outbound_link(link, current_host)
                .then(|| link.raw_href().unwrap_or_default().to_string()),
            Self::Download { file_types } => {
                let pathname = link.pathname();
                is_download_target(&pathname, &file_types[..]).then_some(pathname)
            }
        }
    }
}

struct ClickReporter {
    tracker: Tracker,
    options: OptionsHolder,
    kind: LinkKind,
}

impl ClickReporter {
    fn handle(&self, window: &Window, anchor: NodeId, event: &mut MouseEvent) {
        if !is_trackable_click(event) {
            return;
        }

        let (url, follow) = {
            let host = window.location().host();
            let doc = window.document();
            let Some(link) = doc.anchor(anchor) else {
                return;
            };
            let Some(url) = self.kind.url_prop(&link, &host) else {
                return;
            };
            (url, should_follow_link(event, &link))
        };

        let report = {
            let holder = self.options.borrow();
            let mut props = holder.props.clone().unwrap_or_default();
            props.insert("url".to_string(), PropValue::Str(url));
            EventOptions {
                props: Some(props),
                callback: None,
                data: holder.data.clone(),
            }
        };
        let name = self.kind.event_name();

        if !follow {
            self.tracker.track_event(window, name, report);
            return;
        }

        // Whichever of report callback and fallback timer comes first navigates
        let followed = Rc::new(Cell::new(false));
        let follow_link: EventCallback = Rc::new(move |w: &Window| {
            if followed.replace(true) {
                return;
            }
            if let Err(err) = open_link(w, anchor) {
                tracing::warn!("Failed to follow link {}: {}", anchor, err);
            }
        });

        self.tracker.track_event(window, name, EventOptions {
            callback: Some(follow_link.clone()),
            ..report
        });
        window.set_timeout(FOLLOW_LINK_TIMEOUT, Box::new(move |w: &Window| follow_link(w)));
        event.prevent_default();
    }
}

/// Tracked anchor set, its watcher, and the options holder of one facade
#[derive(Debug)]
pub(crate) struct LinkTracking {
    options: OptionsHolder,
    anchors: Rc<TrackedAnchors>,
    watcher: MutationWatcher,
}

impl LinkTracking {
    pub(crate) fn new(tracker: &Tracker, kind: LinkKind, options: EventOptions) -> Self {
        let options: OptionsHolder = Rc::new(RefCell::new(options));

        let include: IncludeAnchor = {
            let kind = kind.clone();
            Rc::new(move |w: &Window, node: NodeId| {
                let host = w.location().host();
                let doc = w.document();
                doc.anchor(node).is_some_and(|link| kind.includes(&link, &host))
            })
        };
        let handler: ClickHandler = {
            let reporter = ClickReporter {
                tracker: tracker.clone(),
                options: options.clone(),
                kind,
            };
            Rc::new(move |w: &Window, anchor: NodeId, event: &mut MouseEvent| {
                reporter.handle(w, anchor, event)
            })
        };

        Self {
            options,
            anchors: Rc::new(TrackedAnchors::new(include, handler)),
            watcher: MutationWatcher::new(),
        }
    }

    /// Track existing anchors under `root`, then follow mutations
    pub(crate) fn install(&self, window: &Window, root: NodeId) {
        self.anchors.add_node(window, root);
        self.watcher.watch(window, root, self.anchors.clone());
        tracing::debug!("Tracking {} links under {}", self.anchors.len(), root);
    }

    pub(crate) fn cleanup(&self, window: &Window) {
        self.anchors.clear(window);
        self.watcher.disconnect(window);
    }

    pub(crate) fn set_event_options(&self, options: EventOptions) {
        self.options.borrow_mut().merge(options);
    }

    pub(crate) fn anchors(&self) -> &TrackedAnchors {
        &self.anchors
    }

    pub(crate) fn is_watching(&self) -> bool {
        self.watcher.is_watching()
    }
}
