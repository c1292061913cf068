//! Deferred Navigator

use fos_dom::NodeId;
use fos_window::{Window, WindowError};

/// Navigate the way an uninterrupted click on `anchor` would have:
/// `window.open(href, target || "_self", rel tokens joined by commas)`.
pub fn open_link(window: &Window, anchor: NodeId) -> Result<(), WindowError> {
    let (href, target, features) = {
        let doc = window.document();
        let Some(link) = doc.anchor(anchor) else {
            return Ok(());
        };
        let target = match link.target() {
            "" => "_self",
            target => target,
        };
        let features = link.rel().split_ascii_whitespace().collect::<Vec<_>>().join(",");
        (link.raw_href().unwrap_or("").to_string(), target.to_string(), features)
    };

    tracing::debug!("Following {} in {}", href, target);
    window.open(&href, &target, &features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_window::NavigationSource;

    #[test]
    fn test_open_link_defaults_to_self() {
        let window = Window::new("https://example.com/").unwrap();
        let link = window.create_link("https://other.com/landing").unwrap();

        open_link(&window, link).unwrap();
        let navs = window.navigations();
        assert_eq!(navs.len(), 1);
        assert_eq!(navs[0].target, "_self");
        assert_eq!(navs[0].features, "");
        assert_eq!(navs[0].source, NavigationSource::Script);
        assert_eq!(window.location().host(), "other.com");
    }

    #[test]
    fn test_open_link_keeps_target_and_rel() {
        let window = Window::new("https://example.com/").unwrap();
        let link = window.create_link("/docs/guide.pdf").unwrap();
        window.set_attribute(link, "target", "preview").unwrap();
        window.set_attribute(link, "rel", "noopener  noreferrer").unwrap();

        open_link(&window, link).unwrap();
        let nav = &window.navigations()[0];
        assert_eq!(nav.url, "https://example.com/docs/guide.pdf");
        assert_eq!(nav.target, "preview");
        assert_eq!(nav.features, "noopener,noreferrer");
    }

    #[test]
    fn test_open_link_ignores_non_anchor() {
        let window = Window::new("https://example.com/").unwrap();
        let div = window.create_element("div");
        open_link(&window, div).unwrap();
        assert!(window.navigations().is_empty());
    }
}
