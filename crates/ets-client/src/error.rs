use thiserror::Error;

#[derive(Error, Debug)]
pub enum HotelServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hotel API error: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, HotelServiceError>;
