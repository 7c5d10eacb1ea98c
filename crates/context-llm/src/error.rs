use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Completion API returned no choices")]
    EmptyResponse,

    #[error("Failed to encode request: {0}")]
    Encoding(String),
}

impl LLMError {
    /// HTTP status of a non-2xx completion response.
    pub fn status(&self) -> Option<u16> {
        match self {
            LLMError::Api { status, .. } => Some(*status),
            LLMError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LLMError>;
