use context_core::{ContextFragment, DispatchMode};
use context_providers::{ContextRequest, ProviderError, SharedContextProvider};
use futures::future::join_all;

/// What one provider produced for one request.
#[derive(Debug)]
pub struct ProviderOutcome {
    pub context_type: String,
    pub result: Result<ContextFragment, ProviderError>,
}

impl ProviderOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn fragment(&self) -> Option<&ContextFragment> {
        self.result.as_ref().ok()
    }

    pub fn into_fragment(self) -> Option<ContextFragment> {
        self.result.ok()
    }
}

pub(crate) async fn invoke(
    provider: &SharedContextProvider,
    request: &ContextRequest,
) -> ProviderOutcome {
    let context_type = provider.context_type().to_string();
    let result = provider.provide_context(request).await;

    match &result {
        Ok(fragment) => log::debug!(
            "{} context ready (empty: {})",
            context_type,
            fragment.is_empty()
        ),
        Err(e) => log::warn!("{} context failed: {}", context_type, e),
    }

    ProviderOutcome {
        context_type,
        result,
    }
}

/// Runs every provider against the request.
///
/// Outcomes come back in registration order in both modes; concurrent mode only
/// changes when the providers run.
pub async fn dispatch(
    mode: DispatchMode,
    providers: &[SharedContextProvider],
    request: &ContextRequest,
) -> Vec<ProviderOutcome> {
    match mode {
        DispatchMode::Sequential => {
            let mut outcomes = Vec::with_capacity(providers.len());
            for provider in providers {
                outcomes.push(invoke(provider, request).await);
            }
            outcomes
        }
        DispatchMode::Concurrent => {
            join_all(providers.iter().map(|provider| invoke(provider, request))).await
        }
    }
}

/// Keeps the fragments of the providers that succeeded, in outcome order.
pub fn successful_fragments(outcomes: Vec<ProviderOutcome>) -> Vec<ContextFragment> {
    outcomes
        .into_iter()
        .filter_map(ProviderOutcome::into_fragment)
        .collect()
}
