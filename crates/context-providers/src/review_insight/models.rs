use context_core::json::{lenient, lenient_count, lenient_f64, lenient_seq};
use context_core::ContextFragment;
use serde::{Deserialize, Serialize};

use super::provider::REVIEW_INSIGHT_CONTEXT;

/// Scores are on a 0-100 scale, `recommendation_rate` on 0-1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInsights {
    #[serde(default, deserialize_with = "lenient")]
    pub hotel_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_review_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub overall_average: Option<ReviewCategoryScore>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub category_scores: Option<Vec<ReviewCategoryScore>>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub recommendation_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_performance_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub flags: Option<Vec<ReviewInsightFlag>>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub latest_reviews: Option<Vec<ReviewSnippet>>,
}

impl ReviewInsights {
    /// Insights for a hotel without reviews: only the code and a zero count.
    pub fn without_reviews(hotel_code: &str) -> Self {
        Self {
            hotel_code: Some(hotel_code.to_string()),
            total_review_count: Some(0),
            ..Self::default()
        }
    }

    pub fn from_fragment(fragment: &ContextFragment) -> Option<Self> {
        if !fragment.is_type(REVIEW_INSIGHT_CONTEXT) || fragment.is_empty() {
            return None;
        }
        serde_json::from_value(fragment.data.clone()).ok()
    }

    pub fn category_score(&self, name: &str) -> Option<f64> {
        self.category_scores
            .as_deref()?
            .iter()
            .find(|c| c.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .and_then(|c| c.score)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewCategoryScore {
    #[serde(default, alias = "category", deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewInsightFlag {
    /// Machine code such as `SERVICE_VERYGOOD`.
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub flag_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub point: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSnippet {
    /// Masked guest name, e.g. `A***`.
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub review_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub guest_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub room_name: Option<String>,
}
