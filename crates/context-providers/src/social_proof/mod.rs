//! Social proof for a selected hotel: comments and detail from the hotel API,
//! condensed by the model into ratings, sentiment and a short summary.

mod extractor;
mod models;
mod provider;

pub use extractor::{LlmSocialProofExtractor, SocialProofExtractor, SOCIAL_PROOF_SYSTEM_PROMPT};
pub use models::{Feature, SentimentBreakdown, SocialProof, TrendingStatus};
pub use provider::{SocialProofProvider, SOCIAL_PROOF_CONTEXT};
