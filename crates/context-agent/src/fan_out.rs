use context_providers::{ContextRequest, Selection, SharedContextProvider};
use ets_client::Hotel;
use futures::stream::{self, StreamExt};

use crate::dispatch::{invoke, ProviderOutcome};

/// Runs one provider once per selection with at most `limit` requests in flight.
///
/// Outcomes arrive in completion order, not selection order. A `limit` of zero is
/// treated as one.
pub async fn fan_out(
    provider: &SharedContextProvider,
    prompt: &str,
    selections: Vec<Selection>,
    limit: usize,
) -> Vec<ProviderOutcome> {
    log::debug!(
        "Fanning out {} over {} selections (limit {})",
        provider.context_type(),
        selections.len(),
        limit
    );

    stream::iter(selections)
        .map(|selection| {
            let request = ContextRequest::new(prompt).with_selection(selection);
            async move { invoke(provider, &request).await }
        })
        .buffer_unordered(limit.max(1))
        .collect()
        .await
}

/// One selection per hotel that carries a URL or a code.
pub fn selections_for_hotels(hotels: &[Hotel]) -> Vec<Selection> {
    hotels
        .iter()
        .map(|hotel| Selection {
            hotel_url: hotel.url.clone(),
            hotel_code: hotel.hotel_code.clone(),
        })
        .filter(|selection| !selection.is_empty())
        .collect()
}
