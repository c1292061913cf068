//! Tracker Configuration

use crate::TrackerResult;
use serde::Deserialize;

/// Tracker configuration. Fixed for the lifetime of a [`crate::Tracker`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerConfig {
    /// Send events at all
    pub enabled: bool,

    /// Track hash changes as pageviews (hash-based routers)
    pub hash_mode: bool,

    /// Site domain reported with every event. `None` uses the page hostname.
    pub domain: Option<String>,

    /// Collector base URL
    pub api_host: String,

    /// Hostnames that never report
    pub ignored_hostnames: Vec<String>,

    /// Treat `ignored_hostnames` as suffixes (`example.com` also ignores `sub.example.com`)
    pub ignore_sub_domains: bool,

    /// Log ignored events
    pub log_ignored: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hash_mode: false,
            domain: None,
            api_host: "https://plausible.io".to_string(),
            ignored_hostnames: vec!["localhost".to_string()],
            ignore_sub_domains: false,
            log_ignored: false,
        }
    }
}

impl TrackerConfig {
    /// Parse a JSON configuration; missing fields keep their defaults
    pub fn from_json(json: &str) -> TrackerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    pub fn with_api_host(mut self, api_host: &str) -> Self {
        self.api_host = api_host.to_string();
        self
    }

    pub fn with_hash_mode(mut self, hash_mode: bool) -> Self {
        self.hash_mode = hash_mode;
        self
    }

    pub fn with_ignored_hostnames<I, S>(mut self, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_hostnames = hostnames.into_iter().map(Into::into).collect();
        self
    }
}
