//! fOS Analytics
//!
//! Privacy-friendly event tracker for fOS pages, speaking the Plausible
//! collector protocol.
//!
//! The interesting part is automatic event detection:
//! - virtual pageviews for single-page apps (wrapped `pushState`, `popstate`,
//!   optional `hashchange`)
//! - outbound link clicks and file downloads, discovered on the live DOM and
//!   kept in sync through a mutation observer
//!
//! # Example
//! ```rust,ignore
//! use fos_analytics::{EventOptions, Tracker, TrackerConfig};
//! use fos_window::Window;
//!
//! let window = Window::new("https://example.com/")?;
//! let tracker = Tracker::new(TrackerConfig::default())?;
//!
//! let pageviews = tracker.enable_auto_pageviews(&window, EventOptions::default());
//! let outbound = tracker.enable_auto_outbound_tracking(&window, EventOptions::default());
//!
//! // ...
//! outbound.cleanup(&window);
//! pageviews.cleanup(&window);
//! ```

mod auto;
mod classify;
mod config;
mod error;
mod event;
mod interceptor;
mod navigator;
mod payload;
mod tracker;
mod tracking;
mod transport;
mod watcher;

pub use auto::{AutoFileDownloads, AutoOutboundTracking, AutoPageviews, DownloadsOptions};
pub use classify::{
    DEFAULT_FILE_TYPES, is_download_target, is_outbound_link, is_trackable_click,
    should_follow_link, targets_current_window,
};
pub use config::TrackerConfig;
pub use error::{TrackerError, TrackerResult};
pub use event::{
    EventCallback, EventData, EventDataOverride, EventOptions, IgnoreReason, PropValue, Props,
    create_event_data, is_file, is_ignored, is_user_self_excluded,
};
pub use interceptor::NavigationInterceptor;
pub use navigator::open_link;
pub use payload::EventPayload;
pub use tracker::Tracker;
pub use tracking::{ClickHandler, IncludeAnchor, TrackedAnchors};
pub use transport::{HttpTransport, Transport, event_endpoint};
pub use watcher::{MutationWatcher, apply_record, observer_init};

/// Event name of a page view
pub const PAGEVIEW_EVENT: &str = "pageview";

/// Event name of an outbound link click
pub const OUTBOUND_LINK_EVENT: &str = "Outbound Link: Click";

/// Event name of a file download
pub const FILE_DOWNLOAD_EVENT: &str = "File Download";

/// Tracker version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
