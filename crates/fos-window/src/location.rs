//! Location API
//!
//! `window.location` backed by the `url` crate.

use crate::WindowError;
use url::Url;

/// Location state
#[derive(Debug, Clone)]
pub struct LocationManager {
    url: Url,
}

impl LocationManager {
    pub fn new(url_str: &str) -> Result<Self, WindowError> {
        let url = Url::parse(url_str).map_err(|e| WindowError::invalid_url(url_str, e))?;
        Ok(Self { url })
    }

    /// Parsed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolve a possibly relative URL against the current location
    pub fn resolve(&self, url: &str) -> Result<Url, WindowError> {
        self.url.join(url).map_err(|e| WindowError::invalid_url(url, e))
    }

    /// Full URL
    pub fn href(&self) -> String {
        self.url.to_string()
    }

    /// Navigate (relative URLs resolve against the current one)
    pub fn set_href(&mut self, url: &str) -> Result<(), WindowError> {
        self.url = self.resolve(url)?;
        Ok(())
    }

    pub(crate) fn set_url(&mut self, url: Url) {
        self.url = url;
    }

    /// Protocol (e.g., "https:")
    pub fn protocol(&self) -> String {
        format!("{}:", self.url.scheme())
    }

    /// Host (hostname:port, default port omitted)
    pub fn host(&self) -> String {
        match (self.url.host_str(), self.url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        }
    }

    /// Hostname only
    pub fn hostname(&self) -> String {
        self.url.host_str().unwrap_or("").to_string()
    }

    /// Port
    pub fn port(&self) -> String {
        self.url.port().map(|p| p.to_string()).unwrap_or_default()
    }

    /// Pathname
    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Search/query string (including ?)
    pub fn search(&self) -> String {
        self.url.query().map(|q| format!("?{q}")).unwrap_or_default()
    }

    /// Hash/fragment (including #)
    pub fn hash(&self) -> String {
        match self.url.fragment() {
            Some(f) if !f.is_empty() => format!("#{f}"),
            _ => String::new(),
        }
    }

    /// Origin
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parts() {
        let loc = LocationManager::new("https://example.com:8080/path/to/page?query=1#section").unwrap();

        assert_eq!(loc.protocol(), "https:");
        assert_eq!(loc.host(), "example.com:8080");
        assert_eq!(loc.hostname(), "example.com");
        assert_eq!(loc.port(), "8080");
        assert_eq!(loc.pathname(), "/path/to/page");
        assert_eq!(loc.search(), "?query=1");
        assert_eq!(loc.hash(), "#section");
        assert_eq!(loc.origin(), "https://example.com:8080");
    }

    #[test]
    fn test_location_simple() {
        let loc = LocationManager::new("https://example.com/").unwrap();

        assert_eq!(loc.protocol(), "https:");
        assert_eq!(loc.host(), "example.com");
        assert_eq!(loc.port(), "");
        assert_eq!(loc.pathname(), "/");
        assert_eq!(loc.hash(), "");
    }

    #[test]
    fn test_location_set_href() {
        let mut loc = LocationManager::new("https://example.com/a/b").unwrap();
        loc.set_href("c?x=1").unwrap();
        assert_eq!(loc.href(), "https://example.com/a/c?x=1");

        loc.set_href("https://other.com/page").unwrap();
        assert_eq!(loc.hostname(), "other.com");
        assert_eq!(loc.pathname(), "/page");
    }

    #[test]
    fn test_file_protocol() {
        let loc = LocationManager::new("file:///home/user/index.html").unwrap();
        assert_eq!(loc.protocol(), "file:");
        assert_eq!(loc.hostname(), "");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            LocationManager::new("not a url"),
            Err(WindowError::InvalidUrl { .. })
        ));
    }
}
