//! Event listener registry
//!
//! Listeners are keyed by a [`ListenerId`] so removal never depends on
//! closure identity.

use crate::Window;
use fos_dom::{MouseEvent, MouseEventType, NodeId};
use std::collections::HashMap;
use std::rc::Rc;

/// Element-level mouse listener
pub type MouseListener = Rc<dyn Fn(&Window, &mut MouseEvent)>;

/// Window-level listener
pub type WindowListener = Rc<dyn Fn(&Window)>;

/// Listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Window event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventType {
    PopState,
    HashChange,
}

impl WindowEventType {
    /// DOM event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::PopState => "popstate",
            Self::HashChange => "hashchange",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Node(NodeId, MouseEventType),
    Window(WindowEventType),
}

/// Listener registry for one window
#[derive(Default)]
pub struct EventListeners {
    next_id: u64,
    mouse: HashMap<(NodeId, MouseEventType), Vec<(ListenerId, MouseListener)>>,
    window: HashMap<WindowEventType, Vec<(ListenerId, WindowListener)>>,
    slots: HashMap<ListenerId, Slot>,
}

impl std::fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListeners")
            .field("listeners", &self.slots.len())
            .finish()
    }
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, slot: Slot) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.slots.insert(id, slot);
        id
    }

    /// Register a mouse listener on a node
    pub fn add(&mut self, node: NodeId, event_type: MouseEventType, listener: MouseListener) -> ListenerId {
        let id = self.allocate(Slot::Node(node, event_type));
        self.mouse.entry((node, event_type)).or_default().push((id, listener));
        id
    }

    /// Register a window listener
    pub fn add_window(&mut self, event_type: WindowEventType, listener: WindowListener) -> ListenerId {
        let id = self.allocate(Slot::Window(event_type));
        self.window.entry(event_type).or_default().push((id, listener));
        id
    }

    /// Remove any listener by handle. Unknown handles are ignored.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let Some(slot) = self.slots.remove(&id) else {
            return false;
        };
        match slot {
            Slot::Node(node, event_type) => {
                if let Some(list) = self.mouse.get_mut(&(node, event_type)) {
                    list.retain(|(l, _)| *l != id);
                    if list.is_empty() {
                        self.mouse.remove(&(node, event_type));
                    }
                }
            }
            Slot::Window(event_type) => {
                if let Some(list) = self.window.get_mut(&event_type) {
                    list.retain(|(l, _)| *l != id);
                    if list.is_empty() {
                        self.window.remove(&event_type);
                    }
                }
            }
        }
        true
    }

    /// Snapshot of the listeners for one node and type, in registration order
    pub fn mouse_listeners(&self, node: NodeId, event_type: MouseEventType) -> Vec<(ListenerId, MouseListener)> {
        self.mouse.get(&(node, event_type)).cloned().unwrap_or_default()
    }

    /// Snapshot of the window listeners for one type
    pub fn window_listeners(&self, event_type: WindowEventType) -> Vec<(ListenerId, WindowListener)> {
        self.window.get(&event_type).cloned().unwrap_or_default()
    }

    /// Whether a listener is still registered
    pub fn contains(&self, id: ListenerId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Number of listeners attached to a node, across all types
    pub fn count_on(&self, node: NodeId) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Node(n, _) if *n == node))
            .count()
    }

    /// Number of window listeners of one type
    pub fn count_window(&self, event_type: WindowEventType) -> usize {
        self.window.get(&event_type).map_or(0, Vec::len)
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_mouse_listener() {
        let mut listeners = EventListeners::new();
        let node = fos_dom::DomTree::new().create_element("a");
        let click = listeners.add(node, MouseEventType::Click, Rc::new(|_, _| {}));
        let aux = listeners.add(node, MouseEventType::AuxClick, Rc::new(|_, _| {}));

        assert_eq!(listeners.count_on(node), 2);
        assert_eq!(listeners.mouse_listeners(node, MouseEventType::Click).len(), 1);

        assert!(listeners.remove(click));
        assert!(!listeners.remove(click));
        assert!(listeners.mouse_listeners(node, MouseEventType::Click).is_empty());
        assert!(!listeners.contains(click));
        assert!(listeners.contains(aux));

        assert!(listeners.remove(aux));
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_window_listeners() {
        let mut listeners = EventListeners::new();
        let id = listeners.add_window(WindowEventType::PopState, Rc::new(|_| {}));
        assert_eq!(listeners.count_window(WindowEventType::PopState), 1);
        assert_eq!(listeners.count_window(WindowEventType::HashChange), 0);

        listeners.remove(id);
        assert_eq!(listeners.count_window(WindowEventType::PopState), 0);
    }
}
