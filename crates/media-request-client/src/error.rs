use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Overseerr returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode Overseerr response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid media id '{0}': expected a numeric TMDB id")]
    InvalidMediaId(String),

    #[error("Show {0} has no seasons to request")]
    NoSeasons(u64),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Login failed: {0}")]
    Login(String),
}

impl ClientError {
    /// True for errors reported by the remote service itself (non-2xx)
    pub fn is_remote_rejection(&self) -> bool {
        matches!(self, ClientError::Status { .. })
    }
}
