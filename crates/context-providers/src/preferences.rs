use async_trait::async_trait;
use context_core::json::{lenient, lenient_f64, lenient_seq};
use context_core::parse_model_json;
use context_llm::SharedGateway;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const PREFERENCES_SYSTEM_PROMPT: &str = "\
You are a system that extracts structured hotel preferences from a user's travel request.

Respond ONLY in the following strict JSON format:

{
  \"preferredAmenities\": [String] or null,
  \"budgetRange\": { \"min\": Double, \"max\": Double } or null
}

Rules:
- preferredAmenities: include amenities such as \"pool\", \"breakfast\", \"sea view\" only if mentioned.
- budgetRange: infer from wording like \"cheap\", \"affordable\", \"luxury\", \"at most 500\". If no budget is mentioned, return null.
- Return only valid JSON. No explanation, no extra text.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub preferred_amenities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub budget_range: Option<BudgetRange>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub max: Option<f64>,
}

impl UserPreferences {
    pub fn is_empty(&self) -> bool {
        self.preferred_amenities.as_ref().map_or(true, Vec::is_empty) && self.budget_range.is_none()
    }

    /// Plain-text section for prompts that take the preferences into account.
    pub fn describe(&self) -> String {
        let amenities = match self.preferred_amenities.as_deref() {
            Some(list) if !list.is_empty() => list.join(", "),
            _ => "not specified".to_string(),
        };

        let budget = match self.budget_range {
            Some(BudgetRange { min, max }) if min.is_some() || max.is_some() => format!(
                "{} - {}",
                min.map_or("?".to_string(), |v| v.to_string()),
                max.map_or("?".to_string(), |v| v.to_string())
            ),
            _ => "not specified".to_string(),
        };

        format!("User preferences:\nAmenities: {amenities}\nBudget range: {budget}")
    }
}

/// Leaf extraction used by the social proof provider; not a context provider itself.
#[async_trait]
pub trait PreferenceExtractor: Send + Sync {
    async fn extract_preferences(&self, prompt: &str) -> Result<UserPreferences>;
}

pub struct LlmPreferenceExtractor {
    gateway: SharedGateway,
}

impl LlmPreferenceExtractor {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl PreferenceExtractor for LlmPreferenceExtractor {
    async fn extract_preferences(&self, prompt: &str) -> Result<UserPreferences> {
        let user_prompt = format!("User Prompt: \"{prompt}\"");
        let raw = self.gateway.send(PREFERENCES_SYSTEM_PROMPT, &user_prompt).await?;
        Ok(parse_model_json(&raw)?)
    }
}
