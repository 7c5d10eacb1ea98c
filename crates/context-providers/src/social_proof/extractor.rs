use async_trait::async_trait;
use context_core::json::parse_model_object;
use context_core::ExtractionError;
use context_llm::SharedGateway;
use serde_json::Value;

use super::models::SocialProof;
use crate::cache::MemoCache;
use crate::error::Result;
use crate::preferences::UserPreferences;

/// Reviews beyond this count are left out of the prompt.
const MAX_REVIEWS_IN_PROMPT: usize = 50;

pub const SOCIAL_PROOF_SYSTEM_PROMPT: &str = "\
You analyze hotel guest comments and summarize them as social proof for a traveller.

Respond ONLY with a JSON object of this shape:

{
  \"reviewCount\": Int,
  \"averageRating\": Double (0-5),
  \"summary\": String (short overall summary),
  \"popularityScore\": Double (0-1),
  \"highlightedFeatures\": [{\"name\": String, \"score\": Double}] or null,
  \"sentimentBreakdown\": {\"positive\": Double, \"neutral\": Double, \"negative\": Double},
  \"trendingStatus\": \"improving\" | \"stable\" | \"declining\" or null,
  \"personalizedSummary\": String or null
}

Rules:
- Return only valid JSON. No explanation or extra text.
- Sentiment percentages must add up to 100.
- The summary is 20 to 40 words.
- Highlighted features come from frequently mentioned positive comments.
- The trending status follows the trend of the comments.
- The personalized summary addresses the user preferences when they are given.";

#[async_trait]
pub trait SocialProofExtractor: Send + Sync {
    async fn fetch_social_proof(
        &self,
        hotel_url: &str,
        reviews: &[String],
        preferences: Option<&UserPreferences>,
    ) -> Result<SocialProof>;
}

/// Model-backed extractor, memoized per hotel URL.
pub struct LlmSocialProofExtractor {
    gateway: SharedGateway,
    cache: MemoCache<SocialProof>,
}

impl LlmSocialProofExtractor {
    pub fn new(gateway: SharedGateway) -> Self {
        Self::with_cache(gateway, MemoCache::default())
    }

    pub fn with_cache(gateway: SharedGateway, cache: MemoCache<SocialProof>) -> Self {
        Self { gateway, cache }
    }

    fn build_prompt(reviews: &[String], preferences: Option<&UserPreferences>) -> String {
        let mut prompt = String::from("Comments:\n");
        for review in reviews.iter().take(MAX_REVIEWS_IN_PROMPT) {
            prompt.push_str("- ");
            prompt.push_str(review);
            prompt.push('\n');
        }

        if let Some(preferences) = preferences {
            prompt.push('\n');
            prompt.push_str(&preferences.describe());
        }
        prompt
    }
}

#[async_trait]
impl SocialProofExtractor for LlmSocialProofExtractor {
    async fn fetch_social_proof(
        &self,
        hotel_url: &str,
        reviews: &[String],
        preferences: Option<&UserPreferences>,
    ) -> Result<SocialProof> {
        if let Some(cached) = self.cache.get(hotel_url).await {
            log::debug!("Social proof cache hit for {}", hotel_url);
            return Ok(cached);
        }

        let prompt = Self::build_prompt(reviews, preferences);
        let raw = self.gateway.send(SOCIAL_PROOF_SYSTEM_PROMPT, &prompt).await?;

        let object = parse_model_object(&raw)?;
        let mut proof: SocialProof = serde_json::from_value(Value::Object(object))
            .map_err(|e| ExtractionError::UnexpectedShape(e.to_string()))?;
        proof.hotel_url = Some(hotel_url.to_string());

        self.cache.insert(hotel_url, proof.clone()).await;
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::BudgetRange;
    use crate::testing::ScriptedGateway;
    use std::sync::Arc;

    const REPLY: &str = "```json\n{\"reviewCount\": 2, \"averageRating\": 4.5, \"summary\": \"Loved it\"}\n```";

    fn reviews() -> Vec<String> {
        vec!["Great breakfast".to_string(), "Quiet rooms".to_string()]
    }

    #[tokio::test]
    async fn second_call_for_same_hotel_is_cached() {
        let gateway = Arc::new(ScriptedGateway::new().reply(SOCIAL_PROOF_SYSTEM_PROMPT, REPLY));
        let extractor = LlmSocialProofExtractor::new(gateway.clone());

        let first = extractor
            .fetch_social_proof("sea-breeze", &reviews(), None)
            .await
            .unwrap();
        let second = extractor
            .fetch_social_proof("sea-breeze", &[], None)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.hotel_url.as_deref(), Some("sea-breeze"));
        assert_eq!(first.review_count, Some(2));
        assert_eq!(gateway.calls_with(SOCIAL_PROOF_SYSTEM_PROMPT), 1);

        extractor
            .fetch_social_proof("old-town-inn", &reviews(), None)
            .await
            .unwrap();
        assert_eq!(gateway.calls_with(SOCIAL_PROOF_SYSTEM_PROMPT), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let gateway =
            Arc::new(ScriptedGateway::new().reply(SOCIAL_PROOF_SYSTEM_PROMPT, "not json"));
        let extractor = LlmSocialProofExtractor::new(gateway.clone());

        for _ in 0..2 {
            let err = extractor
                .fetch_social_proof("sea-breeze", &reviews(), None)
                .await
                .unwrap_err();
            assert!(err.is_extraction());
        }
        assert_eq!(gateway.calls_with(SOCIAL_PROOF_SYSTEM_PROMPT), 2);
    }

    #[test]
    fn prompt_lists_reviews_and_preferences() {
        let preferences = UserPreferences {
            preferred_amenities: Some(vec!["pool".to_string()]),
            budget_range: Some(BudgetRange {
                min: Some(100.0),
                max: Some(300.0),
            }),
        };

        let prompt = LlmSocialProofExtractor::build_prompt(&reviews(), Some(&preferences));
        assert!(prompt.starts_with("Comments:\n- Great breakfast\n- Quiet rooms\n"));
        assert!(prompt.ends_with("Amenities: pool\nBudget range: 100 - 300"));

        let many: Vec<String> = (0..80).map(|i| format!("review {i}")).collect();
        let prompt = LlmSocialProofExtractor::build_prompt(&many, None);
        assert_eq!(prompt.lines().filter(|l| l.starts_with("- ")).count(), MAX_REVIEWS_IN_PROMPT);
    }
}
