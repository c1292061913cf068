//! Tracker errors

/// Reporting error
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Collector responded with HTTP {status}")]
    Status { status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
