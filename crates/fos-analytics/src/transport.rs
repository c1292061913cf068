//! Collector transport
//!
//! The tracker hands finished payloads to a [`Transport`]. [`HttpTransport`]
//! is the real one; tests plug in recorders.

use crate::{EventPayload, TrackerError, TrackerResult};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Sends one payload to the collector
pub trait Transport {
    fn send(&self, api_host: &str, payload: &EventPayload) -> TrackerResult<()>;
}

/// Event endpoint of a collector
pub fn event_endpoint(api_host: &str) -> String {
    format!("{}/api/event", api_host.trim_end_matches('/'))
}

/// Blocking HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> TrackerResult<Self> {
        Self::with_timeout(Duration::from_secs(10))
    }

    pub fn with_timeout(timeout: Duration) -> TrackerResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(format!("fOS-Analytics/{}", crate::VERSION))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, api_host: &str, payload: &EventPayload) -> TrackerResult<()> {
        let url = event_endpoint(api_host);
        tracing::debug!("POST {} ({})", url, payload.n);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/plain")
            .body(payload.to_json()?)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
