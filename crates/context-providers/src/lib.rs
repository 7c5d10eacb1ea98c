//! context-providers - Strategies that turn a prompt into a context fragment
//!
//! Every provider follows the same two-stage shape: ask the model to structure the
//! request, then call a second data source with that structure.

pub mod cache;
pub mod emotion;
pub mod error;
pub mod hotel_search;
pub mod preferences;
pub mod provider;
pub mod review_insight;
pub mod social_proof;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::MemoCache;
pub use emotion::{EmotionContext, EmotionProvider, Mood, Tone, EMOTION_CONTEXT};
pub use error::ProviderError;
pub use hotel_search::{
    HotelQueryParser, HotelSearchProvider, HotelSearchQuery, HOTEL_SEARCH_CONTEXT,
};
pub use preferences::{BudgetRange, LlmPreferenceExtractor, PreferenceExtractor, UserPreferences};
pub use provider::{ContextProvider, ContextRequest, Selection, SharedContextProvider};
pub use review_insight::{
    LlmReviewInsightExtractor, ReviewInsightExtractor, ReviewInsightProvider, ReviewInsights,
    REVIEW_INSIGHT_CONTEXT,
};
pub use social_proof::{
    LlmSocialProofExtractor, SocialProof, SocialProofExtractor, SocialProofProvider,
    SOCIAL_PROOF_CONTEXT,
};
