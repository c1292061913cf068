//! Window - browsing context for one page
//!
//! Owns the document and every piece of page-global state the tracker
//! touches. All state sits behind `RefCell`s and no borrow is held while a
//! listener, task, or observer callback runs, so callbacks are free to call
//! back into the window.

use crate::{
    EventListeners, HistoryManager, ListenerId, LocalStorage, LocationManager, MouseListener,
    Scheduler, Task, TimerId, WindowError, WindowEventType, WindowListener,
};
use fos_dom::{
    Document, MouseButton, MouseEvent, MouseEventType, MutationObserverId, MutationObserverInit,
    MutationRecord, NodeId,
};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;
use url::Url;

/// Default `window.innerWidth`
const DEFAULT_INNER_WIDTH: u32 = 1280;

/// The history push primitive. Replaceable so it can be wrapped and restored.
pub type PushStateFn = Rc<dyn Fn(&Window, PushStateArgs) -> Result<(), WindowError>>;

/// Mutation observer callback, invoked once per delivered batch
pub type MutationCallback = Rc<dyn Fn(&Window, Vec<MutationRecord>)>;

/// Arguments of `history.pushState(state, title, url)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushStateArgs {
    pub state: Option<String>,
    pub title: String,
    pub url: Option<String>,
}

impl PushStateArgs {
    /// Push to `url` with no state
    pub fn new(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }
}

/// What started a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSource {
    /// `window.open`
    Script,
    /// Default action of a link activation
    Link,
    /// Default action of a link with a `download` attribute
    Download,
}

/// A navigation or new browsing context request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
    pub target: String,
    pub features: String,
    pub source: NavigationSource,
    /// Virtual time of the request
    pub at: Duration,
}

/// Browsing context
pub struct Window {
    document: RefCell<Document>,
    location: RefCell<LocationManager>,
    history: RefCell<HistoryManager>,
    push_state: RefCell<Option<PushStateFn>>,
    listeners: RefCell<EventListeners>,
    mutation_callbacks: RefCell<BTreeMap<MutationObserverId, MutationCallback>>,
    scheduler: RefCell<Scheduler>,
    storage: Option<RefCell<LocalStorage>>,
    navigations: RefCell<Vec<Navigation>>,
    inner_width: Cell<u32>,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("location", &self.location.borrow().href())
            .field("history", &self.history.borrow().length())
            .field("scheduler", &self.scheduler.borrow())
            .finish_non_exhaustive()
    }
}

fn native_push_state(window: &Window, args: PushStateArgs) -> Result<(), WindowError> {
    let url = match &args.url {
        Some(url) => window.location.borrow().resolve(url)?,
        None => window.location.borrow().url().clone(),
    };
    window
        .history
        .borrow_mut()
        .push_state(args.state, args.title, url.to_string());
    tracing::debug!("pushState {}", url);
    window.commit_url(url);
    Ok(())
}

fn is_current_window_target(target: &str) -> bool {
    ["_self", "_parent", "_top"]
        .iter()
        .any(|t| target.eq_ignore_ascii_case(t))
}

impl Window {
    /// Create a window showing an empty document at `url`
    pub fn new(url: &str) -> Result<Self, WindowError> {
        let location = LocationManager::new(url)?;
        let document = Document::new(location.url().clone());
        let history = HistoryManager::new(&location.href());
        let native: PushStateFn = Rc::new(native_push_state);

        Ok(Self {
            document: RefCell::new(document),
            location: RefCell::new(location),
            history: RefCell::new(history),
            push_state: RefCell::new(Some(native)),
            listeners: RefCell::new(EventListeners::new()),
            mutation_callbacks: RefCell::new(BTreeMap::new()),
            scheduler: RefCell::new(Scheduler::new()),
            storage: Some(RefCell::new(LocalStorage::new())),
            navigations: RefCell::new(Vec::new()),
            inner_width: Cell::new(DEFAULT_INNER_WIDTH),
        })
    }

    pub fn with_referrer(mut self, referrer: &str) -> Self {
        self.document.get_mut().set_referrer(referrer);
        self
    }

    pub fn with_inner_width(self, width: u32) -> Self {
        self.inner_width.set(width);
        self
    }

    /// Simulate a host without `history.pushState`
    pub fn without_push_state(mut self) -> Self {
        *self.push_state.get_mut() = None;
        self
    }

    /// Simulate a host where `localStorage` throws (e.g. disabled cookies)
    pub fn without_local_storage(mut self) -> Self {
        self.storage = None;
        self
    }

    // === Page state ===

    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    pub fn location(&self) -> Ref<'_, LocationManager> {
        self.location.borrow()
    }

    pub fn history(&self) -> Ref<'_, HistoryManager> {
        self.history.borrow()
    }

    /// `document.referrer`
    pub fn referrer(&self) -> String {
        self.document.borrow().referrer().to_string()
    }

    pub fn inner_width(&self) -> u32 {
        self.inner_width.get()
    }

    pub fn local_storage(&self) -> Result<RefMut<'_, LocalStorage>, WindowError> {
        self.storage
            .as_ref()
            .map(RefCell::borrow_mut)
            .ok_or(WindowError::StorageUnavailable)
    }

    fn commit_url(&self, url: Url) {
        self.location.borrow_mut().set_url(url.clone());
        self.document.borrow_mut().set_url(url);
    }

    // === DOM shortcuts ===

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.document.borrow_mut().tree_mut().create_element(tag)
    }

    /// Create a detached `<a href=...>`
    pub fn create_link(&self, href: &str) -> Result<NodeId, WindowError> {
        Ok(self.document.borrow_mut().create_link(href)?)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<NodeId, WindowError> {
        Ok(self.document.borrow_mut().tree_mut().append_child(parent, child)?)
    }

    /// Append to `<body>`
    pub fn append_to_body(&self, child: NodeId) -> Result<NodeId, WindowError> {
        let body = self.document.borrow().body();
        self.append_child(body, child)
    }

    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<NodeId, WindowError> {
        Ok(self.document.borrow_mut().tree_mut().remove_child(parent, child)?)
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), WindowError> {
        Ok(self.document.borrow_mut().tree_mut().set_attribute(node, name, value)?)
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) -> Result<(), WindowError> {
        Ok(self.document.borrow_mut().tree_mut().remove_attribute(node, name)?)
    }

    // === History ===

    /// Currently installed push primitive, `None` if the host has none
    pub fn push_state_fn(&self) -> Option<PushStateFn> {
        self.push_state.borrow().clone()
    }

    /// Install a push primitive (or remove it with `None`)
    pub fn set_push_state_fn(&self, push_state: Option<PushStateFn>) {
        *self.push_state.borrow_mut() = push_state;
    }

    /// `history.pushState(...)` through whatever primitive is installed
    pub fn push_state(&self, args: PushStateArgs) -> Result<(), WindowError> {
        let push_state = self.push_state_fn().ok_or(WindowError::PushStateUnavailable)?;
        push_state(self, args)
    }

    /// `history.replaceState(...)`. Never intercepted.
    pub fn replace_state(&self, args: PushStateArgs) -> Result<(), WindowError> {
        let url = match &args.url {
            Some(url) => self.location.borrow().resolve(url)?,
            None => self.location.borrow().url().clone(),
        };
        self.history
            .borrow_mut()
            .replace_state(args.state, args.title, url.to_string());
        self.commit_url(url);
        Ok(())
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Traverse history. Queues `popstate`, plus `hashchange` when the
    /// fragment changed, for the next task turn.
    pub fn go(&self, delta: i32) -> bool {
        let entry = self.history.borrow_mut().go(delta).cloned();
        let Some(entry) = entry else {
            return false;
        };
        let Ok(url) = Url::parse(&entry.url) else {
            tracing::warn!("Unparseable history entry {}", entry.url);
            return false;
        };
        let hash_changed = self.location.borrow().url().fragment() != url.fragment();
        self.commit_url(url);

        self.queue_task(Box::new(|w: &Window| w.dispatch_window_event(WindowEventType::PopState)));
        if hash_changed {
            self.queue_task(Box::new(|w: &Window| w.dispatch_window_event(WindowEventType::HashChange)));
        }
        true
    }

    /// Fragment navigation (`location.hash = ...`). Fires `hashchange`.
    pub fn set_hash(&self, fragment: &str) {
        let fragment = fragment.trim_start_matches('#');
        let mut url = self.location.borrow().url().clone();
        if url.fragment() == Some(fragment) {
            return;
        }
        url.set_fragment(Some(fragment));
        self.history
            .borrow_mut()
            .push_state(None, String::new(), url.to_string());
        self.commit_url(url);
        self.queue_task(Box::new(|w: &Window| w.dispatch_window_event(WindowEventType::HashChange)));
    }

    // === Navigation ===

    /// `window.open(url, target, features)`. An empty target means `_blank`.
    pub fn open(&self, url: &str, target: &str, features: &str) -> Result<(), WindowError> {
        let url = self.location.borrow().resolve(url)?;
        let target = if target.is_empty() { "_blank" } else { target };
        self.navigate(url, target, features, NavigationSource::Script);
        Ok(())
    }

    fn navigate(&self, url: Url, target: &str, features: &str, source: NavigationSource) {
        tracing::debug!("Navigating {} to {} ({:?})", target, url, source);
        self.navigations.borrow_mut().push(Navigation {
            url: url.to_string(),
            target: target.to_string(),
            features: features.to_string(),
            source,
            at: self.now(),
        });
        if source != NavigationSource::Download && is_current_window_target(target) {
            self.history
                .borrow_mut()
                .push_state(None, String::new(), url.to_string());
            self.commit_url(url);
        }
    }

    /// Every navigation requested so far, oldest first
    pub fn navigations(&self) -> Vec<Navigation> {
        self.navigations.borrow().clone()
    }

    // === Events ===

    pub fn add_event_listener(&self, node: NodeId, event_type: MouseEventType, listener: MouseListener) -> ListenerId {
        self.listeners.borrow_mut().add(node, event_type, listener)
    }

    pub fn add_window_listener(&self, event_type: WindowEventType, listener: WindowListener) -> ListenerId {
        self.listeners.borrow_mut().add_window(event_type, listener)
    }

    /// Remove an element or window listener
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }

    /// Listeners attached to a node
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.borrow().count_on(node)
    }

    pub fn window_listener_count(&self, event_type: WindowEventType) -> usize {
        self.listeners.borrow().count_window(event_type)
    }

    /// Fire a window event synchronously
    pub fn dispatch_window_event(&self, event_type: WindowEventType) {
        self.perform_microtask_checkpoint();
        tracing::trace!("Dispatching {}", event_type.name());
        let listeners = self.listeners.borrow().window_listeners(event_type);
        for (id, listener) in listeners {
            if self.listeners.borrow().contains(id) {
                listener(self);
            }
        }
        self.perform_microtask_checkpoint();
    }

    /// Dispatch a mouse event at `target`, bubbling up through its ancestors,
    /// then run the default action unless a listener prevented it.
    pub fn dispatch_mouse_event(&self, target: NodeId, event: MouseEvent) -> MouseEvent {
        // A user event starts a new task: earlier DOM edits are observed first
        self.perform_microtask_checkpoint();
        tracing::trace!("Dispatching {} at {}", event.event_type.name(), target);

        let mut event = event;
        let path = self.document.borrow().tree().ancestors(target);

        for node in path {
            let listeners = self.listeners.borrow().mouse_listeners(node, event.event_type);
            for (id, listener) in listeners {
                // Removed by an earlier listener in this dispatch
                if !self.listeners.borrow().contains(id) {
                    continue;
                }
                listener(self, &mut event);
            }
            if event.is_propagation_stopped() || !event.bubbles {
                break;
            }
        }
        self.perform_microtask_checkpoint();

        if !event.is_default_prevented() {
            self.activation_behavior(target, &event);
        }
        event
    }

    fn activation_behavior(&self, target: NodeId, event: &MouseEvent) {
        let new_context = match (event.event_type, event.button) {
            (MouseEventType::Click, MouseButton::Primary) => {
                event.ctrl_key || event.meta_key || event.shift_key
            }
            (MouseEventType::AuxClick, MouseButton::Auxiliary) => true,
            _ => return,
        };

        let link = {
            let doc = self.document.borrow();
            doc.tree().ancestors(target).into_iter().find_map(|id| {
                let anchor = doc.anchor(id)?;
                let url = anchor.url()?;
                Some((url, anchor.target().to_string(), anchor.has_download()))
            })
        };
        let Some((url, link_target, download)) = link else {
            return;
        };

        if download {
            self.navigate(url, "", "", NavigationSource::Download);
        } else if new_context {
            self.navigate(url, "_blank", "", NavigationSource::Link);
        } else {
            let link_target = if link_target.is_empty() { "_self".to_string() } else { link_target };
            self.navigate(url, &link_target, "", NavigationSource::Link);
        }
        self.perform_microtask_checkpoint();
    }

    // === Mutation observers ===

    pub fn create_mutation_observer(&self, callback: MutationCallback) -> MutationObserverId {
        let id = self.document.borrow_mut().tree_mut().observers_mut().create();
        self.mutation_callbacks.borrow_mut().insert(id, callback);
        id
    }

    pub fn observe(&self, id: MutationObserverId, target: NodeId, options: MutationObserverInit) -> bool {
        self.document
            .borrow_mut()
            .tree_mut()
            .observers_mut()
            .observe(id, target, options)
    }

    /// Stop observing and drop undelivered records
    pub fn disconnect(&self, id: MutationObserverId) {
        self.document.borrow_mut().tree_mut().observers_mut().disconnect(id);
        self.mutation_callbacks.borrow_mut().remove(&id);
    }

    /// Number of live mutation observers
    pub fn mutation_observer_count(&self) -> usize {
        self.mutation_callbacks.borrow().len()
    }

    /// Deliver queued mutation records, one batch per observer in creation
    /// order, until no observer has anything pending.
    pub fn perform_microtask_checkpoint(&self) {
        loop {
            let pending = self.document.borrow().tree().observers().pending();
            if pending.is_empty() {
                break;
            }
            for id in pending {
                let records = self.document.borrow_mut().tree_mut().observers_mut().take_records(id);
                let callback = self.mutation_callbacks.borrow().get(&id).cloned();
                if let Some(callback) = callback {
                    if !records.is_empty() {
                        callback(self, records);
                    }
                }
            }
        }
    }

    // === Scheduling ===

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.scheduler.borrow().now()
    }

    pub fn queue_task(&self, task: Task) {
        self.scheduler.borrow_mut().queue_task(task);
    }

    /// `setTimeout`
    pub fn set_timeout(&self, delay: Duration, task: Task) -> TimerId {
        self.scheduler.borrow_mut().set_timeout(delay, task)
    }

    /// `clearTimeout`
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.scheduler.borrow_mut().clear(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.borrow().pending_timers()
    }

    /// Run queued tasks (and the microtasks they cause) until none are left.
    /// Timers are not touched.
    pub fn run_until_idle(&self) {
        self.perform_microtask_checkpoint();
        loop {
            let task = self.scheduler.borrow_mut().pop_task();
            let Some(task) = task else {
                break;
            };
            task(self);
            self.perform_microtask_checkpoint();
        }
    }

    /// Move the virtual clock forward, firing every timer that comes due
    pub fn advance(&self, duration: Duration) {
        let limit = self.now() + duration;
        self.run_until_idle();
        loop {
            let task = self.scheduler.borrow_mut().pop_due(limit);
            let Some(task) = task else {
                break;
            };
            task(self);
            self.run_until_idle();
        }
        self.scheduler.borrow_mut().advance_to(limit);
    }
}
