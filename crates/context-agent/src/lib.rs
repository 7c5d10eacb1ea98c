//! context-agent - Context registry and dispatcher
//!
//! [`ContextAgentManager`] owns the ordered provider registry. It asks every provider
//! for a fragment, keeps the ones that succeeded, and can forward them with the prompt
//! to the completion gateway.

pub mod dispatch;
pub mod fan_out;
pub mod insights;
pub mod manager;
pub mod provider_factory;

pub use dispatch::{dispatch, successful_fragments, ProviderOutcome};
pub use fan_out::{fan_out, selections_for_hotels};
pub use insights::fetch_review_insight;
pub use manager::ContextAgentManager;
pub use provider_factory::{
    create_provider, create_providers, FactoryError, ProviderServices, AVAILABLE_PROVIDERS,
};

pub use context_core::{ContextFragment, DispatchMode};
pub use context_providers::{ContextProvider, ContextRequest, Selection, SharedContextProvider};
