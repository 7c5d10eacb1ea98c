pub mod error;
pub mod gateway;
pub mod openai;

pub use error::{LLMError, Result};
pub use gateway::{build_completion_prompt, LLMGateway, SharedGateway, TRAVEL_GUIDE_SYSTEM_PROMPT};
pub use openai::OpenAIGateway;
