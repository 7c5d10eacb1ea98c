//! Review insight for a selected hotel code: scores, diagnostic flags and the
//! latest reviews, inferred by the model from the hotel's review texts.

mod extractor;
mod models;
mod provider;

pub use extractor::{
    LlmReviewInsightExtractor, ReviewInsightExtractor, REVIEW_INSIGHT_SYSTEM_PROMPT,
};
pub use models::{ReviewCategoryScore, ReviewInsightFlag, ReviewInsights, ReviewSnippet};
pub use provider::{ReviewInsightProvider, REVIEW_INSIGHT_CONTEXT};
