//! Automatic file download tracking

use super::links::{LinkKind, LinkTracking};
use crate::{DEFAULT_FILE_TYPES, EventOptions, Tracker};
use fos_dom::NodeId;
use fos_window::Window;
use serde::Deserialize;

/// Download tracking options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DownloadsOptions {
    /// Extensions (without the dot) reported as downloads. Case-sensitive.
    pub file_types: Vec<String>,
}

impl Default for DownloadsOptions {
    fn default() -> Self {
        Self {
            file_types: DEFAULT_FILE_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl DownloadsOptions {
    pub fn with_file_types<I, S>(file_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            file_types: file_types.into_iter().map(Into::into).collect(),
        }
    }
}

/// Reports clicks on same-host links to tracked file types
#[derive(Debug)]
pub struct AutoFileDownloads {
    links: LinkTracking,
}

impl AutoFileDownloads {
    pub fn new(tracker: &Tracker, downloads: DownloadsOptions, options: EventOptions) -> Self {
        let kind = LinkKind::Download {
            file_types: downloads.file_types.into(),
        };
        Self {
            links: LinkTracking::new(tracker, kind, options),
        }
    }

    /// Track same-host links anywhere in the document
    pub fn install(&self, window: &Window) {
        let root = window.document().root();
        self.install_under(window, root);
    }

    pub fn install_under(&self, window: &Window, root: NodeId) {
        self.links.install(window, root);
    }

    pub fn cleanup(&self, window: &Window) {
        self.links.cleanup(window);
    }

    pub fn set_event_options(&self, options: EventOptions) {
        self.links.set_event_options(options);
    }

    pub fn is_tracked(&self, anchor: NodeId) -> bool {
        self.links.anchors().contains(anchor)
    }

    pub fn tracked(&self) -> Vec<NodeId> {
        self.links.anchors().anchors()
    }

    pub fn is_observing(&self) -> bool {
        self.links.is_watching()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_types() {
        let options = DownloadsOptions::default();
        assert_eq!(options.file_types.len(), 25);
        assert!(options.file_types.iter().any(|t| t == "pdf"));
    }

    #[test]
    fn test_options_from_json() {
        let options: DownloadsOptions = serde_json::from_str(r#"{"fileTypes": ["epub"]}"#).unwrap();
        assert_eq!(options, DownloadsOptions::with_file_types(["epub"]));

        let options: DownloadsOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, DownloadsOptions::default());
    }
}
