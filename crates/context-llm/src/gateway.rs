use std::sync::Arc;

use async_trait::async_trait;
use context_core::ContextFragment;

use crate::error::{LLMError, Result};

/// System instruction used when composing the final answer from aggregated contexts.
pub const TRAVEL_GUIDE_SYSTEM_PROMPT: &str = "\
You are a travel assistant helping a user find a hotel. The user's request is given \
together with a list of JSON contexts gathered for it (hotel search results, the user's \
emotional state, social proof and review insights for selected hotels). Use the contexts \
to ground your answer, suggest suitable hotels and nearby places to visit, and adapt your \
tone to the detected emotion when one is present. If the contexts are empty, answer from \
general knowledge and say that no live hotel data was available. Reply in English using a \
professional tone.";

/// Single point of contact with the completion API.
#[async_trait]
pub trait LLMGateway: Send + Sync {
    /// Sends one system + user prompt pair and returns the first completion's text.
    async fn send(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Composes the final answer for `prompt` from the aggregated `contexts`.
    async fn complete(&self, prompt: &str, contexts: &[ContextFragment]) -> Result<String> {
        let user_prompt = build_completion_prompt(prompt, contexts)?;
        self.send(TRAVEL_GUIDE_SYSTEM_PROMPT, &user_prompt).await
    }
}

pub type SharedGateway = Arc<dyn LLMGateway>;

/// Builds the user message for [`LLMGateway::complete`]: the prompt followed by the
/// contexts as pretty-printed JSON.
pub fn build_completion_prompt(prompt: &str, contexts: &[ContextFragment]) -> Result<String> {
    let context_json =
        serde_json::to_string_pretty(contexts).map_err(|e| LLMError::Encoding(e.to_string()))?;

    Ok(format!(
        "User Prompt: {}\n\nContexts:\n{}",
        prompt, context_json
    ))
}
