use async_trait::async_trait;
use context_core::json::{lenient, parse_model_object};
use context_core::{ContextFragment, ExtractionError};
use context_llm::SharedGateway;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::provider::{to_fragment_data, ContextProvider, ContextRequest};

pub const EMOTION_CONTEXT: &str = "emotion";

pub const EMOTION_SYSTEM_PROMPT: &str = "\
Determine the user's emotional state from the text and respond in JSON:

{
  \"mood\": \"stressed\" | \"relaxed\" | \"excited\" | \"neutral\",
  \"tone\": \"supportive\" | \"professional\" | \"friendly\"
}

Only return valid JSON.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Stressed,
    Relaxed,
    Excited,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Supportive,
    Professional,
    Friendly,
}

/// Values outside the closed sets decode as absent and are left out when serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionContext {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
}

impl EmotionContext {
    pub fn from_fragment(fragment: &ContextFragment) -> Option<Self> {
        if !fragment.is_type(EMOTION_CONTEXT) {
            return None;
        }
        serde_json::from_value(fragment.data.clone()).ok()
    }
}

/// Classifies the prompt's mood and the tone an answer should take.
pub struct EmotionProvider {
    gateway: SharedGateway,
}

impl EmotionProvider {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }

    pub async fn detect(&self, prompt: &str) -> Result<EmotionContext> {
        let raw = self.gateway.send(EMOTION_SYSTEM_PROMPT, prompt).await?;
        let object = parse_model_object(&raw)?;

        let emotion = serde_json::from_value(Value::Object(object))
            .map_err(|e| ExtractionError::UnexpectedShape(e.to_string()))?;
        Ok(emotion)
    }
}

#[async_trait]
impl ContextProvider for EmotionProvider {
    fn context_type(&self) -> &str {
        EMOTION_CONTEXT
    }

    async fn provide_context(&self, request: &ContextRequest) -> Result<ContextFragment> {
        let emotion = self.detect(&request.prompt).await?;
        log::debug!("Detected emotion {:?}", emotion);

        Ok(ContextFragment::new(EMOTION_CONTEXT, to_fragment_data(&emotion)?))
    }
}
