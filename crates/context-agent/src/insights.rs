use context_core::fragment::find_fragment;
use context_providers::review_insight::{ReviewInsights, REVIEW_INSIGHT_CONTEXT};
use context_providers::{ContextRequest, Selection};

use crate::manager::ContextAgentManager;

/// Review insight for one hotel, gathered through the manager's registered providers.
///
/// Returns `None` when no review insight provider is registered or it failed; the
/// failure itself is logged by the dispatcher.
pub async fn fetch_review_insight(
    manager: &ContextAgentManager,
    hotel_code: &str,
    prompt: &str,
) -> Option<ReviewInsights> {
    let request = ContextRequest::new(prompt).with_selection(Selection::hotel_code(hotel_code));
    let contexts = manager.respond_with_contexts_for(&request).await;

    let Some(fragment) = find_fragment(&contexts, REVIEW_INSIGHT_CONTEXT) else {
        log::warn!("No review insight produced for {}", hotel_code);
        return None;
    };

    let mut insights = ReviewInsights::from_fragment(fragment)?;
    insights.hotel_code = Some(hotel_code.to_string());
    Some(insights)
}
