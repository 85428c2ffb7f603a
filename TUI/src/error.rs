use thiserror::Error;

/// Failures reading or writing the persisted theme.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unrecognized stored value: {0:?}")]
    Invalid(String),
}

/// Failures inside the text-completion client. Never shown to the user
/// directly; they are mapped to canned replies.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no API key configured")]
    MissingKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("offline mode")]
    Offline,
}

impl CompletionError {
    pub fn status(&self) -> Option<u16> {
        match self {
            CompletionError::Status(code) => Some(*code),
            CompletionError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("email relay is not configured")]
    NotConfigured,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relay returned status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("offline mode")]
    Offline,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
