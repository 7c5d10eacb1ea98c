use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use context_core::{Config, ContextFragment, DispatchMode};
use context_llm::{LLMError, SharedGateway};
use context_providers::{ContextProvider, ContextRequest, Selection, SharedContextProvider};

use crate::dispatch::{dispatch, successful_fragments, ProviderOutcome};
use crate::fan_out::fan_out;

const DEFAULT_FAN_OUT_LIMIT: usize = 4;

/// Ordered provider registry plus the gateway used for the final answer.
///
/// Registration takes `&self`, so one manager can be shared behind an `Arc`. Each
/// dispatch works on a snapshot of the registry taken when it starts.
pub struct ContextAgentManager {
    providers: RwLock<Vec<SharedContextProvider>>,
    gateway: SharedGateway,
    dispatch_mode: DispatchMode,
    fan_out_limit: usize,
}

impl ContextAgentManager {
    pub fn new(gateway: SharedGateway) -> Self {
        Self {
            providers: RwLock::new(Vec::new()),
            gateway,
            dispatch_mode: DispatchMode::default(),
            fan_out_limit: DEFAULT_FAN_OUT_LIMIT,
        }
    }

    /// Dispatch mode and fan-out limit from the config; providers are registered separately.
    pub fn from_config(gateway: SharedGateway, config: &Config) -> Self {
        Self::new(gateway)
            .with_dispatch_mode(config.dispatch_mode)
            .with_fan_out_limit(config.fan_out_limit)
    }

    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = mode;
        self
    }

    pub fn with_fan_out_limit(mut self, limit: usize) -> Self {
        self.fan_out_limit = limit.max(1);
        self
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        self.dispatch_mode
    }

    pub fn fan_out_limit(&self) -> usize {
        self.fan_out_limit
    }

    /// Appends a provider. The same context type may be registered more than once;
    /// every registration contributes its own fragment.
    pub fn register_provider<P>(&self, provider: P)
    where
        P: ContextProvider + 'static,
    {
        self.register_shared(Arc::new(provider));
    }

    pub fn register_shared(&self, provider: SharedContextProvider) {
        log::info!("Registering {} context provider", provider.context_type());
        self.write_providers().push(provider);
    }

    pub fn reset_providers(&self) {
        let mut providers = self.write_providers();
        log::info!("Clearing {} context providers", providers.len());
        providers.clear();
    }

    pub fn provider_count(&self) -> usize {
        self.read_providers().len()
    }

    /// Context types in registration order.
    pub fn context_types(&self) -> Vec<String> {
        self.read_providers()
            .iter()
            .map(|p| p.context_type().to_string())
            .collect()
    }

    /// First registered provider with the given context type.
    pub fn provider(&self, context_type: &str) -> Option<SharedContextProvider> {
        self.read_providers()
            .iter()
            .find(|p| p.context_type() == context_type)
            .cloned()
    }

    /// One outcome per registered provider, in registration order.
    pub async fn collect_outcomes(&self, request: &ContextRequest) -> Vec<ProviderOutcome> {
        let providers = self.snapshot();
        log::debug!(
            "Dispatching {} providers ({:?})",
            providers.len(),
            self.dispatch_mode
        );
        dispatch(self.dispatch_mode, &providers, request).await
    }

    pub async fn respond_with_contexts(&self, prompt: &str) -> Vec<ContextFragment> {
        self.respond_with_contexts_for(&ContextRequest::new(prompt))
            .await
    }

    /// Fragments of the providers that succeeded; failures are logged and left out.
    pub async fn respond_with_contexts_for(
        &self,
        request: &ContextRequest,
    ) -> Vec<ContextFragment> {
        let outcomes = self.collect_outcomes(request).await;
        let total = outcomes.len();
        let fragments = successful_fragments(outcomes);

        if fragments.len() < total {
            log::info!("{} of {} providers produced context", fragments.len(), total);
        }
        fragments
    }

    pub async fn respond(&self, prompt: &str) -> Result<String, LLMError> {
        self.respond_for(&ContextRequest::new(prompt)).await
    }

    /// Collects contexts, then asks the gateway for the final answer.
    ///
    /// Provider failures never fail this call; a gateway failure does.
    pub async fn respond_for(&self, request: &ContextRequest) -> Result<String, LLMError> {
        let contexts = self.respond_with_contexts_for(request).await;
        self.gateway.complete(&request.prompt, &contexts).await
    }

    /// Runs the registered provider of `context_type` once per selection, bounded by
    /// the fan-out limit. Unknown types yield no fragments.
    pub async fn fan_out_contexts(
        &self,
        context_type: &str,
        prompt: &str,
        selections: Vec<Selection>,
    ) -> Vec<ContextFragment> {
        let Some(provider) = self.provider(context_type) else {
            log::warn!("No {} provider registered for fan-out", context_type);
            return Vec::new();
        };

        let outcomes = fan_out(&provider, prompt, selections, self.fan_out_limit).await;
        successful_fragments(outcomes)
    }

    fn snapshot(&self) -> Vec<SharedContextProvider> {
        self.read_providers().clone()
    }

    fn read_providers(&self) -> RwLockReadGuard<'_, Vec<SharedContextProvider>> {
        self.providers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_providers(&self) -> RwLockWriteGuard<'_, Vec<SharedContextProvider>> {
        self.providers.write().unwrap_or_else(|e| e.into_inner())
    }
}
