use thiserror::Error;

/// Top-level error type used across the entire application.
///
/// The fetch path keeps transport, HTTP status and body-parsing failures
/// apart so callers can tell them from each other.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ReportError {
    /// `true` for failures that happen before any target could be written.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Status { .. } | Self::Parse(_)
        )
    }
}

pub type Result<T, E = ReportError> = std::result::Result<T, E>;
