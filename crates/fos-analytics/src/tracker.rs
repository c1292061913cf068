//! Event reporting core

use crate::{
    AutoFileDownloads, AutoOutboundTracking, AutoPageviews, DownloadsOptions, EventOptions,
    EventPayload, HttpTransport, IgnoreReason, PAGEVIEW_EVENT, TrackerConfig, TrackerError, TrackerResult,
    Transport, create_event_data, is_file, is_ignored, is_user_self_excluded,
};
use fos_window::Window;
use std::rc::Rc;

/// Tracker handle. Cheap to clone; clones share config and transport.
#[derive(Clone)]
pub struct Tracker {
    config: Rc<TrackerConfig>,
    transport: Rc<dyn Transport>,
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Tracker {
    /// Tracker reporting over HTTP
    pub fn new(config: TrackerConfig) -> TrackerResult<Self> {
        Ok(Self::with_transport(config, Rc::new(HttpTransport::new()?)))
    }

    pub fn with_transport(config: TrackerConfig, transport: Rc<dyn Transport>) -> Self {
        Self {
            config: Rc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Configured domain, or the page hostname
    pub fn domain(&self, window: &Window) -> String {
        self.config
            .domain
            .clone()
            .unwrap_or_else(|| window.location().hostname())
    }

    /// Check whether events from this page are suppressed
    pub fn ignore_reason(&self, window: &Window, domain: &str) -> Option<IgnoreReason> {
        if !self.config.enabled {
            Some(IgnoreReason::Disabled)
        } else if is_file(&window.location().protocol()) {
            Some(IgnoreReason::FileProtocol)
        } else if is_ignored(domain, self.config.ignored_hostnames.as_slice(), self.config.ignore_sub_domains) {
            Some(IgnoreReason::IgnoredHostname)
        } else if is_user_self_excluded(window) {
            Some(IgnoreReason::SelfExcluded)
        } else {
            None
        }
    }

    /// Report an event. Fire and forget.
    ///
    /// The page data is captured now; the send happens on the next task turn.
    /// The callback runs once the collector has answered (any status), or
    /// right away on that turn when the event is suppressed. A send that
    /// never reaches the collector only logs.
    pub fn track_event(&self, window: &Window, name: &str, options: EventOptions) {
        let data = create_event_data(window, options.data.as_ref());
        let domain = self.domain(window);
        let payload = match EventPayload::new(name, &domain, &data, self.config.hash_mode, options.props.as_ref()) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!("Failed to build {} payload: {}", name, err);
                return;
            }
        };
        let callback = options.callback;

        if let Some(reason) = self.ignore_reason(window, &domain) {
            if self.config.log_ignored {
                tracing::info!(event = name, url = %payload.u, "Ignoring event ({})", reason);
            }
            if let Some(callback) = callback {
                window.queue_task(Box::new(move |w: &Window| callback(w)));
            }
            return;
        }

        let transport = self.transport.clone();
        let api_host = self.config.api_host.clone();
        window.queue_task(Box::new(move |w: &Window| {
            match transport.send(&api_host, &payload) {
                Ok(()) => {
                    tracing::debug!("Sent {} for {}", payload.n, payload.u);
                    if let Some(callback) = callback {
                        callback(w);
                    }
                }
                // The collector answered, so the attempt is complete
                Err(err @ TrackerError::Status { .. }) => {
                    tracing::warn!("Collector rejected {} event: {}", payload.n, err);
                    if let Some(callback) = callback {
                        callback(w);
                    }
                }
                Err(err) => tracing::warn!("Failed to send {} event: {}", payload.n, err),
            }
        }));
    }

    /// Report a pageview
    pub fn track_pageview(&self, window: &Window, options: EventOptions) {
        self.track_event(window, PAGEVIEW_EVENT, options);
    }

    /// Track the current page and every virtual navigation after it
    pub fn enable_auto_pageviews(&self, window: &Window, options: EventOptions) -> AutoPageviews {
        let pageviews = AutoPageviews::new(self, options);
        pageviews.install(window);
        pageviews
    }

    /// Track clicks on links leaving the site
    pub fn enable_auto_outbound_tracking(&self, window: &Window, options: EventOptions) -> AutoOutboundTracking {
        let outbound = AutoOutboundTracking::new(self, options);
        outbound.install(window);
        outbound
    }

    /// Track clicks on same-site links to files
    pub fn enable_auto_file_downloads_tracking(
        &self,
        window: &Window,
        downloads: DownloadsOptions,
        options: EventOptions,
    ) -> AutoFileDownloads {
        let tracking = AutoFileDownloads::new(self, downloads, options);
        tracking.install(window);
        tracking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<(String, EventPayload)>>,
        offline: Cell<bool>,
        status: Cell<Option<u16>>,
    }

    impl Transport for Recorder {
        fn send(&self, api_host: &str, payload: &EventPayload) -> TrackerResult<()> {
            if self.offline.get() {
                return Err(unreachable_collector());
            }
            if let Some(status) = self.status.get() {
                return Err(TrackerError::Status { status });
            }
            self.sent.borrow_mut().push((api_host.to_string(), payload.clone()));
            Ok(())
        }
    }

    fn unreachable_collector() -> TrackerError {
        let err = reqwest::blocking::Client::new()
            .post("http://[::1")
            .build()
            .unwrap_err();
        TrackerError::Network(err)
    }

    fn setup(config: TrackerConfig) -> (Window, Tracker, Rc<Recorder>) {
        let window = Window::new("https://example.com/home").unwrap();
        let recorder = Rc::new(Recorder::default());
        let tracker = Tracker::with_transport(config, recorder.clone());
        (window, tracker, recorder)
    }

    #[test]
    fn test_track_event_sends_on_next_turn() {
        let (window, tracker, recorder) = setup(TrackerConfig::default());
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();

        tracker.track_event(&window, "signup", EventOptions::new()
            .with_prop("plan", "pro")
            .with_callback(move |_| flag.set(true)));
        assert!(recorder.sent.borrow().is_empty());

        window.run_until_idle();
        let sent = recorder.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "https://plausible.io");
        assert_eq!(sent[0].1.n, "signup");
        assert_eq!(sent[0].1.d, "example.com");
        assert_eq!(sent[0].1.p.as_deref(), Some(r#"{"plan":"pro"}"#));
        assert!(done.get());
    }

    #[test]
    fn test_configured_domain() {
        let (window, tracker, recorder) = setup(TrackerConfig::default().with_domain("example.org"));
        tracker.track_pageview(&window, EventOptions::new());
        window.run_until_idle();
        assert_eq!(recorder.sent.borrow()[0].1.d, "example.org");
    }

    #[test]
    fn test_ignored_event_still_calls_back() {
        let config = TrackerConfig::default().with_ignored_hostnames(["example.com"]);
        let (window, tracker, recorder) = setup(config);
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();

        tracker.track_pageview(&window, EventOptions::new().with_callback(move |_| flag.set(true)));
        assert!(!done.get());
        window.run_until_idle();
        assert!(done.get());
        assert!(recorder.sent.borrow().is_empty());
    }

    #[test]
    fn test_unreachable_collector_skips_callback() {
        let (window, tracker, recorder) = setup(TrackerConfig::default());
        recorder.offline.set(true);
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();

        tracker.track_pageview(&window, EventOptions::new().with_callback(move |_| flag.set(true)));
        window.run_until_idle();
        assert!(!done.get());
    }

    #[test]
    fn test_error_status_still_calls_back() {
        let (window, tracker, recorder) = setup(TrackerConfig::default());
        recorder.status.set(Some(503));
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();

        tracker.track_pageview(&window, EventOptions::new().with_callback(move |_| flag.set(true)));
        window.run_until_idle();
        assert!(done.get());
        assert!(recorder.sent.borrow().is_empty());
    }

    #[test]
    fn test_ignore_reasons() {
        let (window, tracker, _) = setup(TrackerConfig {
            enabled: false,
            ..Default::default()
        });
        assert_eq!(tracker.ignore_reason(&window, "example.com"), Some(IgnoreReason::Disabled));

        let (window, tracker, _) = setup(TrackerConfig::default());
        assert_eq!(tracker.ignore_reason(&window, "example.com"), None);
        assert_eq!(tracker.ignore_reason(&window, "localhost"), Some(IgnoreReason::IgnoredHostname));

        window.local_storage().unwrap().set_item("plausible_ignore", "true");
        assert_eq!(tracker.ignore_reason(&window, "example.com"), Some(IgnoreReason::SelfExcluded));

        let window = Window::new("file:///tmp/index.html").unwrap();
        assert_eq!(tracker.ignore_reason(&window, ""), Some(IgnoreReason::FileProtocol));
    }

    #[test]
    fn test_payload_captures_page_at_call_time() {
        let (window, tracker, recorder) = setup(TrackerConfig::default());
        tracker.track_pageview(&window, EventOptions::new());
        window.replace_state(fos_window::PushStateArgs::new("/later")).unwrap();
        window.run_until_idle();
        assert_eq!(recorder.sent.borrow()[0].1.u, "https://example.com/home");
    }
}
