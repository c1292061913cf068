//! Event options, page data and suppression rules

use fos_window::Window;
use serde::Serialize;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Custom property value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Custom properties bound to an event
pub type Props = BTreeMap<String, PropValue>;

/// Completion callback of a reported event
pub type EventCallback = Rc<dyn Fn(&Window)>;

/// Per-event overrides of the ambient page data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDataOverride {
    pub url: Option<String>,
    pub referrer: Option<String>,
    pub device_width: Option<u32>,
}

/// Page context reported with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventData {
    pub url: String,
    /// `None` when the page has no referrer
    pub referrer: Option<String>,
    pub device_width: u32,
}

/// Snapshot the page context, applying overrides field by field
pub fn create_event_data(window: &Window, overrides: Option<&EventDataOverride>) -> EventData {
    let overrides = overrides.cloned().unwrap_or_default();
    let referrer = overrides.referrer.unwrap_or_else(|| window.referrer());

    EventData {
        url: overrides.url.unwrap_or_else(|| window.location().href()),
        referrer: (!referrer.is_empty()).then_some(referrer),
        device_width: overrides.device_width.unwrap_or_else(|| window.inner_width()),
    }
}

/// Options of a single report
///
/// Facades keep one of these in a shared holder; [`EventOptions::merge`]
/// implements `setEventOptions`.
#[derive(Clone, Default)]
pub struct EventOptions {
    pub props: Option<Props>,
    pub callback: Option<EventCallback>,
    pub data: Option<EventDataOverride>,
}

impl std::fmt::Debug for EventOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventOptions")
            .field("props", &self.props)
            .field("callback", &self.callback.is_some())
            .field("data", &self.data)
            .finish()
    }
}

impl EventOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one property
    pub fn with_prop(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.props
            .get_or_insert_with(Props::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    pub fn with_callback(mut self, callback: impl Fn(&Window) + 'static) -> Self {
        self.callback = Some(Rc::new(callback));
        self
    }

    pub fn with_data(mut self, data: EventDataOverride) -> Self {
        self.data = Some(data);
        self
    }

    /// Overwrite the fields present in `other`, keep the rest
    pub fn merge(&mut self, other: EventOptions) {
        if other.props.is_some() {
            self.props = other.props;
        }
        if other.callback.is_some() {
            self.callback = other.callback;
        }
        if other.data.is_some() {
            self.data = other.data;
        }
    }
}

/// Why an event was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Disabled,
    FileProtocol,
    IgnoredHostname,
    SelfExcluded,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::Disabled => "tracker disabled",
            Self::FileProtocol => "file: protocol",
            Self::IgnoredHostname => "ignored hostname",
            Self::SelfExcluded => "plausible_ignore is set in localStorage",
        };
        f.write_str(reason)
    }
}

/// Pages opened from disk never report
pub fn is_file(protocol: &str) -> bool {
    protocol == "file:"
}

/// Exact hostname match, or suffix match on `.<ignored>` when `sub_domains`
pub fn is_ignored<S: AsRef<str>>(hostname: &str, ignored: &[S], sub_domains: bool) -> bool {
    ignored.iter().map(AsRef::as_ref).any(|ignored| {
        hostname == ignored
            || (sub_domains
                && hostname
                    .strip_suffix(ignored)
                    .is_some_and(|prefix| prefix.ends_with('.')))
    })
}

/// The visitor opted out with `localStorage.plausible_ignore = "true"`.
/// Unavailable storage counts as not excluded.
pub fn is_user_self_excluded(window: &Window) -> bool {
    match window.local_storage() {
        Ok(storage) => storage.get_item("plausible_ignore") == Some("true"),
        Err(_) => false,
    }
}
