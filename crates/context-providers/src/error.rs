use context_core::ExtractionError;
use context_llm::LLMError;
use ets_client::HotelServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    #[error("Hotel service error: {0}")]
    HotelService(#[from] HotelServiceError),

    #[error("No search location found for {0:?}")]
    LocationNotFound(String),
}

impl ProviderError {
    /// True when the model answered but its output could not be used.
    pub fn is_extraction(&self) -> bool {
        matches!(self, ProviderError::Extraction(_))
    }

    /// True when one of the upstream HTTP services failed.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ProviderError::Llm(_) | ProviderError::HotelService(_))
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
