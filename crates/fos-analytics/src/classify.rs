//! Link Classifier
//!
//! Pure predicates over an anchor and the mouse event that hit it.

use fos_dom::{Anchor, MouseButton, MouseEvent, MouseEventType};

/// File extensions tracked as downloads unless overridden
pub const DEFAULT_FILE_TYPES: [&str; 25] = [
    "pdf", "xlsx", "docx", "txt", "rtf", "csv", "exe", "key", "pps", "ppt", "pptx", "7z", "pkg",
    "rar", "gz", "zip", "avi", "mov", "mp4", "mpeg", "wmv", "midi", "mp3", "wav", "wma",
];

/// The link resolves to a host other than `current_host`
pub fn is_outbound_link(link: &Anchor<'_>, current_host: &str) -> bool {
    if link.href().is_empty() {
        return false;
    }
    let host = link.host();
    !host.is_empty() && host != current_host
}

/// The last dot-delimited segment of `pathname` is a tracked extension
pub fn is_download_target<S: AsRef<str>>(pathname: &str, file_types: &[S]) -> bool {
    match pathname.rsplit_once('.') {
        Some((_, extension)) if !extension.is_empty() => {
            file_types.iter().any(|t| t.as_ref() == extension)
        }
        _ => false,
    }
}

/// `target` names the current browsing context
pub fn targets_current_window(target: &str) -> bool {
    target.is_empty()
        || ["_self", "_parent", "_top"]
            .iter()
            .any(|t| target.eq_ignore_ascii_case(t))
}

/// Intercept the click and navigate ourselves once the event is reported?
///
/// Never for clicks another handler already cancelled, native downloads,
/// modified clicks, non-primary clicks, or links opening elsewhere.
pub fn should_follow_link(event: &MouseEvent, link: &Anchor<'_>) -> bool {
    if event.is_default_prevented() || link.has_download() {
        return false;
    }
    let plain_click = event.event_type == MouseEventType::Click
        && event.button == MouseButton::Primary
        && !(event.ctrl_key || event.meta_key || event.shift_key);

    plain_click && targets_current_window(link.target())
}

/// `auxclick` fires for every non-primary button; only the middle one counts
pub fn is_trackable_click(event: &MouseEvent) -> bool {
    !(event.event_type == MouseEventType::AuxClick && event.button != MouseButton::Auxiliary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::{Document, NodeId};
    use url::Url;

    fn doc() -> Document {
        Document::new(Url::parse("https://example.com/blog/").unwrap())
    }

    fn link(doc: &mut Document, href: Option<&str>, attrs: &[(&str, &str)]) -> NodeId {
        let node = doc.tree_mut().create_element("a");
        if let Some(href) = href {
            doc.tree_mut().set_attribute(node, "href", href).unwrap();
        }
        for (name, value) in attrs {
            doc.tree_mut().set_attribute(node, name, value).unwrap();
        }
        node
    }

    #[test]
    fn test_outbound() {
        let mut doc = doc();
        let other = link(&mut doc, Some("https://other.com/"), &[]);
        let same = link(&mut doc, Some("/about"), &[]);
        let port = link(&mut doc, Some("https://example.com:8443/"), &[]);
        let bare = link(&mut doc, None, &[]);
        let mail = link(&mut doc, Some("mailto:hi@example.com"), &[]);

        let outbound = |node| is_outbound_link(&doc.anchor(node).unwrap(), "example.com");
        assert!(outbound(other));
        assert!(!outbound(same));
        assert!(outbound(port));
        assert!(!outbound(bare));
        assert!(!outbound(mail));
    }

    #[test]
    fn test_download_target() {
        assert!(is_download_target("/files/report.pdf", &DEFAULT_FILE_TYPES));
        assert!(is_download_target("/a.b/archive.tar.gz", &DEFAULT_FILE_TYPES));
        assert!(!is_download_target("/files/report.PDF", &DEFAULT_FILE_TYPES));
        assert!(!is_download_target("/files/report", &DEFAULT_FILE_TYPES));
        assert!(!is_download_target("/files/report.", &DEFAULT_FILE_TYPES));
        assert!(!is_download_target("", &DEFAULT_FILE_TYPES));
        assert!(is_download_target("/data.json", &["json".to_string()]));
    }

    #[test]
    fn test_targets_current_window() {
        assert!(targets_current_window(""));
        assert!(targets_current_window("_SELF"));
        assert!(targets_current_window("_top"));
        assert!(!targets_current_window("_blank"));
        assert!(!targets_current_window("preview"));
    }

    #[test]
    fn test_should_follow_link() {
        let mut doc = doc();
        let plain = link(&mut doc, Some("https://other.com/"), &[]);
        let blank = link(&mut doc, Some("https://other.com/"), &[("target", "_blank")]);
        let download = link(&mut doc, Some("/a.pdf"), &[("download", "")]);
        let follow = |node, event: &MouseEvent| should_follow_link(event, &doc.anchor(node).unwrap());

        assert!(follow(plain, &MouseEvent::click()));
        assert!(!follow(plain, &MouseEvent::click().with_ctrl()));
        assert!(!follow(plain, &MouseEvent::click().with_meta()));
        assert!(!follow(plain, &MouseEvent::click().with_shift()));
        assert!(!follow(plain, &MouseEvent::middle_click()));
        assert!(!follow(blank, &MouseEvent::click()));
        assert!(!follow(download, &MouseEvent::click()));

        let mut prevented = MouseEvent::click();
        prevented.prevent_default();
        assert!(!follow(plain, &prevented));
    }

    #[test]
    fn test_trackable_click() {
        assert!(is_trackable_click(&MouseEvent::click()));
        assert!(is_trackable_click(&MouseEvent::middle_click()));
        assert!(!is_trackable_click(&MouseEvent::aux_click(MouseButton::Secondary)));
        assert!(!is_trackable_click(&MouseEvent::aux_click(MouseButton::Fourth)));
    }
}
