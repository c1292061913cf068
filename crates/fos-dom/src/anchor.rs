//! Anchor element view
//!
//! Mirrors the URL-decomposition getters of `HTMLAnchorElement`: the raw
//! `href` attribute is resolved against the document URL on every read.

use crate::{DomTree, NodeId};
use url::Url;

/// Read-only view of an `<a>` element
#[derive(Debug, Clone, Copy)]
pub struct Anchor<'a> {
    tree: &'a DomTree,
    base: &'a Url,
    node: NodeId,
}

impl<'a> Anchor<'a> {
    pub(crate) fn new(tree: &'a DomTree, base: &'a Url, node: NodeId) -> Option<Self> {
        if !tree.is_element_named(node, "a") {
            return None;
        }
        Some(Self { tree, base, node })
    }

    /// The element this view reads from
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The `href` attribute as written
    pub fn raw_href(&self) -> Option<&'a str> {
        self.tree.get_attribute(self.node, "href")
    }

    /// Resolved `href`, if it parses against the document URL
    pub fn url(&self) -> Option<Url> {
        self.base.join(self.raw_href()?).ok()
    }

    /// Resolved `href`. Empty without the attribute, verbatim when unresolvable.
    pub fn href(&self) -> String {
        match (self.raw_href(), self.url()) {
            (_, Some(url)) => url.to_string(),
            (Some(raw), None) => raw.to_string(),
            (None, None) => String::new(),
        }
    }

    /// `hostname[:port]`; default ports are omitted, host-less schemes give ""
    pub fn host(&self) -> String {
        let Some(url) = self.url() else {
            return String::new();
        };
        match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        }
    }

    /// Hostname without port
    pub fn hostname(&self) -> String {
        self.url()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Path component of the resolved URL
    pub fn pathname(&self) -> String {
        self.url().map(|url| url.path().to_string()).unwrap_or_default()
    }

    /// `target` attribute, empty when absent
    pub fn target(&self) -> &'a str {
        self.tree.get_attribute(self.node, "target").unwrap_or("")
    }

    /// `rel` attribute, empty when absent
    pub fn rel(&self) -> &'a str {
        self.tree.get_attribute(self.node, "rel").unwrap_or("")
    }

    /// Check for a `download` attribute (any value)
    pub fn has_download(&self) -> bool {
        self.tree.has_attribute(self.node, "download")
    }
}
