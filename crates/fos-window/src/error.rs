//! Window errors

use fos_dom::DomError;

/// Browsing context error
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("history.pushState is not available")]
    PushStateUnavailable,

    #[error("localStorage is not available")]
    StorageUnavailable,

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

impl WindowError {
    pub(crate) fn invalid_url(url: &str, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            source,
        }
    }
}
