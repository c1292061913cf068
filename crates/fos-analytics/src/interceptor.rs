//! Virtual Navigation Interceptor
//!
//! Wraps the window's `pushState` primitive and listens for `popstate` (and
//! `hashchange` in hash mode) so a single-page app reports every route
//! change. The saved primitive is put back verbatim on cleanup.
//!
//! Only one interceptor should be active per window. Nested installs work
//! if they are cleaned up in reverse order.

use fos_window::{ListenerId, PushStateArgs, PushStateFn, Window, WindowEventType};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Interceptor state for one install
pub struct NavigationInterceptor {
    hash_mode: bool,
    on_navigate: Rc<dyn Fn(&Window)>,
    original: RefCell<Option<PushStateFn>>,
    popstate: Cell<Option<ListenerId>>,
    hashchange: Cell<Option<ListenerId>>,
}

impl std::fmt::Debug for NavigationInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationInterceptor")
            .field("hash_mode", &self.hash_mode)
            .field("wrapped", &self.original.borrow().is_some())
            .field("popstate", &self.popstate.get())
            .field("hashchange", &self.hashchange.get())
            .finish()
    }
}

impl NavigationInterceptor {
    pub fn new(hash_mode: bool, on_navigate: impl Fn(&Window) + 'static) -> Self {
        Self {
            hash_mode,
            on_navigate: Rc::new(on_navigate),
            original: RefCell::new(None),
            popstate: Cell::new(None),
            hashchange: Cell::new(None),
        }
    }

    /// Hook navigation and report the current page once
    pub fn install(&self, window: &Window) {
        match window.push_state_fn() {
            Some(original) => {
                let inner = original.clone();
                let on_navigate = self.on_navigate.clone();
                let wrapped: PushStateFn = Rc::new(move |w: &Window, args: PushStateArgs| {
                    inner(w, args)?;
                    on_navigate(w);
                    Ok(())
                });
                window.set_push_state_fn(Some(wrapped));
                *self.original.borrow_mut() = Some(original);

                let id = window.add_window_listener(WindowEventType::PopState, self.on_navigate.clone());
                self.popstate.set(Some(id));
            }
            None => tracing::debug!("No pushState on this page, virtual navigations are not tracked"),
        }

        if self.hash_mode {
            let id = window.add_window_listener(WindowEventType::HashChange, self.on_navigate.clone());
            self.hashchange.set(Some(id));
        }

        (self.on_navigate)(window);
    }

    /// Restore the saved primitive and drop the listeners. Safe to repeat,
    /// and safe without a prior install.
    pub fn cleanup(&self, window: &Window) {
        let original = self.original.borrow_mut().take();
        if let Some(original) = original {
            window.set_push_state_fn(Some(original));
        }
        for slot in [&self.popstate, &self.hashchange] {
            if let Some(id) = slot.take() {
                window.remove_event_listener(id);
            }
        }
    }

    /// `pushState` is currently wrapped by this interceptor
    pub fn is_wrapping(&self) -> bool {
        self.original.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(window_url: &str, hash_mode: bool) -> (Window, NavigationInterceptor, Rc<Cell<usize>>) {
        let window = Window::new(window_url).unwrap();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let interceptor = NavigationInterceptor::new(hash_mode, move |_| counter.set(counter.get() + 1));
        (window, interceptor, calls)
    }

    #[test]
    fn test_install_reports_current_page() {
        let (window, interceptor, calls) = counting("https://example.com/", false);
        interceptor.install(&window);
        assert_eq!(calls.get(), 1);
        assert!(interceptor.is_wrapping());
    }

    #[test]
    fn test_push_state_reports_after_push() {
        let (window, _, _) = counting("https://example.com/", false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let interceptor = NavigationInterceptor::new(false, move |w: &Window| {
            sink.borrow_mut().push(w.location().pathname().to_string());
        });
        interceptor.install(&window);

        window.push_state(PushStateArgs::new("/checkout")).unwrap();
        assert_eq!(*seen.borrow(), vec!["/", "/checkout"]);
    }

    #[test]
    fn test_popstate_and_hashchange() {
        let (window, interceptor, calls) = counting("https://example.com/", false);
        interceptor.install(&window);
        window.push_state(PushStateArgs::new("/a")).unwrap();
        window.back();
        window.run_until_idle();
        assert_eq!(calls.get(), 3);

        // Not in hash mode
        window.dispatch_window_event(WindowEventType::HashChange);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_restore_is_verbatim() {
        let (window, interceptor, _) = counting("https://example.com/", true);
        let before = window.push_state_fn().unwrap();

        interceptor.install(&window);
        assert!(!Rc::ptr_eq(&window.push_state_fn().unwrap(), &before));

        interceptor.cleanup(&window);
        assert!(Rc::ptr_eq(&window.push_state_fn().unwrap(), &before));
        assert_eq!(window.window_listener_count(WindowEventType::PopState), 0);
        assert_eq!(window.window_listener_count(WindowEventType::HashChange), 0);

        interceptor.cleanup(&window);
        assert!(Rc::ptr_eq(&window.push_state_fn().unwrap(), &before));
    }

    #[test]
    fn test_missing_push_state() {
        let (window, interceptor, calls) = counting("https://example.com/", true);
        let window = window.without_push_state();

        interceptor.install(&window);
        assert_eq!(calls.get(), 1);
        assert!(!interceptor.is_wrapping());
        assert_eq!(window.window_listener_count(WindowEventType::PopState), 0);
        assert_eq!(window.window_listener_count(WindowEventType::HashChange), 1);

        interceptor.cleanup(&window);
        assert!(window.push_state_fn().is_none());
        assert_eq!(window.window_listener_count(WindowEventType::HashChange), 0);
    }

    #[test]
    fn test_cleanup_without_install() {
        let (window, interceptor, calls) = counting("https://example.com/", true);
        interceptor.cleanup(&window);
        assert!(window.push_state_fn().is_some());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_nested_installs_unwind_in_reverse() {
        let (window, outer, outer_calls) = counting("https://example.com/", false);
        let native = window.push_state_fn().unwrap();
        let inner_calls = Rc::new(Cell::new(0));
        let counter = inner_calls.clone();
        let inner = NavigationInterceptor::new(false, move |_| counter.set(counter.get() + 1));

        outer.install(&window);
        inner.install(&window);
        window.push_state(PushStateArgs::new("/x")).unwrap();
        assert_eq!(outer_calls.get(), 2);
        assert_eq!(inner_calls.get(), 2);

        inner.cleanup(&window);
        outer.cleanup(&window);
        assert!(Rc::ptr_eq(&window.push_state_fn().unwrap(), &native));
    }
}
