//! Auto-tracking facades
//!
//! Each facade wires one category of automatic events and exposes
//! `install` / `cleanup` / `set_event_options`. Installing twice without a
//! cleanup in between double-wires; that is up to the caller.

mod downloads;
mod links;
mod outbound;
mod pageviews;

pub use downloads::{AutoFileDownloads, DownloadsOptions};
pub use outbound::AutoOutboundTracking;
pub use pageviews::AutoPageviews;

use crate::EventOptions;
use std::cell::RefCell;
use std::rc::Rc;

/// Options shared between a facade and the closures it installs
pub(crate) type OptionsHolder = Rc<RefCell<EventOptions>>;
