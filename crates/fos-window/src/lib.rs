//! fOS Window
//!
//! Headless browsing context for a single page.
//!
//! Features:
//! - Location and session history with a replaceable `pushState` primitive
//! - Element and window event listeners (`click`, `auxclick`, `popstate`, `hashchange`)
//! - Mutation observer delivery at the microtask checkpoint
//! - Task queue and `setTimeout` on a virtual clock
//! - `window.open` navigation log and `localStorage`
//!
//! Everything runs on one thread; callbacks receive the [`Window`] they were
//! registered on instead of capturing it.

mod error;
mod history;
mod listeners;
mod location;
mod storage;
mod timers;
mod window;

pub use error::WindowError;
pub use history::{HistoryEntry, HistoryManager};
pub use listeners::{EventListeners, ListenerId, MouseListener, WindowEventType, WindowListener};
pub use location::LocationManager;
pub use storage::LocalStorage;
pub use timers::{Scheduler, Task, TimerId};
pub use window::{
    MutationCallback, Navigation, NavigationSource, PushStateArgs, PushStateFn, Window,
};
