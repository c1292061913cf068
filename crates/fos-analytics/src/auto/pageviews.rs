//! Automatic pageviews

use super::OptionsHolder;
use crate::{EventOptions, NavigationInterceptor, Tracker};
use fos_window::Window;
use std::cell::RefCell;
use std::rc::Rc;

/// Pageview on install and on every virtual navigation
#[derive(Debug)]
pub struct AutoPageviews {
    options: OptionsHolder,
    interceptor: NavigationInterceptor,
}

impl AutoPageviews {
    pub fn new(tracker: &Tracker, options: EventOptions) -> Self {
        let options: OptionsHolder = Rc::new(RefCell::new(options));
        let page = {
            let tracker = tracker.clone();
            let options = options.clone();
            move |w: &Window| {
                let options = options.borrow().clone();
                tracker.track_pageview(w, options);
            }
        };

        Self {
            interceptor: NavigationInterceptor::new(tracker.config().hash_mode, page),
            options,
        }
    }

    pub fn install(&self, window: &Window) {
        tracing::debug!("Installing automatic pageviews");
        self.interceptor.install(window);
    }

    pub fn cleanup(&self, window: &Window) {
        self.interceptor.cleanup(window);
    }

    /// Affects every later pageview
    pub fn set_event_options(&self, options: EventOptions) {
        self.options.borrow_mut().merge(options);
    }
}
