use context_core::json::{lenient, lenient_count, lenient_f64, lenient_seq};
use context_core::ContextFragment;
use serde::{Deserialize, Serialize};

use super::provider::SOCIAL_PROOF_CONTEXT;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProof {
    #[serde(default, deserialize_with = "lenient")]
    pub hotel_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub review_count: Option<u32>,
    /// 0-5
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    /// 0-1
    #[serde(default, deserialize_with = "lenient_f64")]
    pub popularity_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub highlighted_features: Option<Vec<Feature>>,
    #[serde(default, deserialize_with = "lenient")]
    pub sentiment_breakdown: Option<SentimentBreakdown>,
    #[serde(default, deserialize_with = "lenient")]
    pub trending_status: Option<TrendingStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub personalized_summary: Option<String>,
}

impl SocialProof {
    /// Reads the social proof out of a `social_proof` fragment. Empty fragments yield `None`.
    pub fn from_fragment(fragment: &ContextFragment) -> Option<Self> {
        if !fragment.is_type(SOCIAL_PROOF_CONTEXT) {
            return None;
        }
        let proof = fragment.data.get("socialProof")?;
        serde_json::from_value(proof.clone()).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
}

/// Percentages, expected to add up to roughly 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub positive: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub neutral: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub negative: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingStatus {
    #[serde(alias = "Improving", alias = "İyileşiyor")]
    Improving,
    #[serde(alias = "Stable", alias = "Sabit")]
    Stable,
    #[serde(alias = "Declining", alias = "Geriliyor")]
    Declining,
}
