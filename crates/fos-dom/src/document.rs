//! Document - High-level document API

use crate::{Anchor, DomResult, DomTree, NodeId};
use url::Url;

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL, also the base for relative links
    url: Url,
    /// `document.referrer`, empty when unknown
    referrer: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a document with an `<html><head/><body/></html>` skeleton
    pub fn new(url: Url) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under a fresh root cannot violate the hierarchy.
        let _ = tree.append_child(NodeId::ROOT, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url,
            referrer: String::new(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Document URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Replace the document URL (history navigation)
    pub fn set_url(&mut self, url: Url) {
        self.url = url;
    }

    pub fn referrer(&self) -> &str {
        &self.referrer
    }

    pub fn set_referrer(&mut self, referrer: &str) {
        self.referrer = referrer.to_string();
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// View `node` as an anchor, if it is an `<a>` element
    pub fn anchor(&self, node: NodeId) -> Option<Anchor<'_>> {
        Anchor::new(&self.tree, &self.url, node)
    }

    /// All anchors under `root`, in document order
    pub fn anchors(&self, root: NodeId) -> Vec<NodeId> {
        self.tree.elements_by_tag_name(root, "a")
    }

    /// Create a detached `<a href=...>`
    pub fn create_link(&mut self, href: &str) -> DomResult<NodeId> {
        let link = self.tree.create_element("a");
        self.tree.set_attribute(link, "href", href)?;
        Ok(link)
    }
}
