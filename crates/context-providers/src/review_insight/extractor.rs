use async_trait::async_trait;
use context_core::json::parse_model_object;
use context_core::ExtractionError;
use context_llm::SharedGateway;
use serde_json::Value;

use super::models::ReviewInsights;
use crate::error::Result;

pub(crate) const MAX_REVIEWS_IN_PROMPT: usize = 50;

pub const REVIEW_INSIGHT_SYSTEM_PROMPT: &str = "\
You are a high-precision agent that extracts structured insights from hotel guest reviews.

Process the raw reviews and return machine-parseable JSON matching the requested structure.
Reflect everything that is stated or strongly implied: guest type, score and evaluation flags.
If something is not mentioned, leave it null. Do not invent facts.
All scores use a 0-100 scale. Strengths and weaknesses become flags such as SERVICE_VERYGOOD or LOCATION_FAR.
Respond only with valid JSON. No text outside the JSON.";

#[async_trait]
pub trait ReviewInsightExtractor: Send + Sync {
    async fn fetch_review_insights(
        &self,
        hotel_code: &str,
        reviews: &[String],
    ) -> Result<ReviewInsights>;
}

pub struct LlmReviewInsightExtractor {
    gateway: SharedGateway,
}

impl LlmReviewInsightExtractor {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }

    fn build_prompt(hotel_code: &str, reviews: &[String]) -> String {
        let mut review_block = String::new();
        for review in reviews.iter().take(MAX_REVIEWS_IN_PROMPT) {
            review_block.push_str("- ");
            review_block.push_str(review);
            review_block.push('\n');
        }

        format!(
            "\
Analyze the reviews below and return the insights as JSON.

- Infer category scores (service, cleanliness, location, food, value for money) when clearly implied.
- Each flag carries a machine code, a human-readable name, its category and a 0-100 point.
- Base the recommendation rate on wording like \"recommend\", \"would return\" or \"never again\".
- Leave values null when nothing can reasonably be inferred.

Hotel Code: \"{hotel_code}\"

Reviews:
{review_block}
Required JSON structure:

{{
  \"hotelCode\": \"{hotel_code}\",
  \"averageScore\": float | null,
  \"totalReviewCount\": integer | null,
  \"overallAverage\": {{ \"category\": \"Overall\", \"score\": float }},
  \"categoryScores\": [{{ \"category\": string, \"score\": float }}],
  \"recommendationRate\": float | null,
  \"pricePerformanceScore\": float | null,
  \"flags\": [{{ \"type\": string, \"name\": string, \"category\": string, \"point\": integer }}],
  \"latestReviews\": [{{ \"name\": \"A***\", \"reviewText\": string, \"date\": string, \"guestType\": string, \"score\": float, \"roomName\": string | null }}]
}}"
        )
    }
}

#[async_trait]
impl ReviewInsightExtractor for LlmReviewInsightExtractor {
    async fn fetch_review_insights(
        &self,
        hotel_code: &str,
        reviews: &[String],
    ) -> Result<ReviewInsights> {
        let prompt = Self::build_prompt(hotel_code, reviews);
        let raw = self.gateway.send(REVIEW_INSIGHT_SYSTEM_PROMPT, &prompt).await?;

        let object = parse_model_object(&raw)?;
        let mut insights: ReviewInsights = serde_json::from_value(Value::Object(object))
            .map_err(|e| ExtractionError::UnexpectedShape(e.to_string()))?;

        // the model sometimes echoes a different code, or none
        insights.hotel_code = Some(hotel_code.to_string());
        Ok(insights)
    }
}
