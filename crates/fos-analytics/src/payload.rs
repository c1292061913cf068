//! Collector payload

use crate::{EventData, Props, TrackerResult};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/event`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Event name
    pub n: String,
    /// Page URL
    pub u: String,
    /// Site domain
    pub d: String,
    /// Referrer
    pub r: Option<String>,
    /// Device width
    pub w: u32,
    /// 1 in hash mode
    pub h: u8,
    /// Props, JSON-encoded a second time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
}

impl EventPayload {
    pub fn new(
        name: &str,
        domain: &str,
        data: &EventData,
        hash_mode: bool,
        props: Option<&Props>,
    ) -> TrackerResult<Self> {
        Ok(Self {
            n: name.to_string(),
            u: data.url.clone(),
            d: domain.to_string(),
            r: data.referrer.clone(),
            w: data.device_width,
            h: u8::from(hash_mode),
            p: props.map(serde_json::to_string).transpose()?,
        })
    }

    pub fn to_json(&self) -> TrackerResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropValue;

    fn data() -> EventData {
        EventData {
            url: "https://example.com/docs".into(),
            referrer: None,
            device_width: 1280,
        }
    }

    #[test]
    fn test_payload_without_props() {
        let payload = EventPayload::new("pageview", "example.com", &data(), false, None).unwrap();
        assert_eq!(
            payload.to_json().unwrap(),
            r#"{"n":"pageview","u":"https://example.com/docs","d":"example.com","r":null,"w":1280,"h":0}"#
        );
    }

    #[test]
    fn test_payload_props_are_a_json_string() {
        let mut props = Props::new();
        props.insert("url".into(), PropValue::from("https://other.com/"));

        let payload = EventPayload::new("Outbound Link: Click", "example.com", &data(), true, Some(&props)).unwrap();
        assert_eq!(payload.h, 1);
        assert_eq!(payload.p.as_deref(), Some(r#"{"url":"https://other.com/"}"#));

        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert_eq!(json["p"], r#"{"url":"https://other.com/"}"#);
    }

    #[test]
    fn test_empty_props_still_sent() {
        let payload = EventPayload::new("signup", "example.com", &data(), false, Some(&Props::new())).unwrap();
        assert_eq!(payload.p.as_deref(), Some("{}"));
    }
}
