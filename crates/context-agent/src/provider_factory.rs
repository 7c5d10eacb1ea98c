//! Provider Factory
//!
//! Creates context providers by name from shared services.

use std::sync::Arc;
use std::time::Duration;

use context_core::Config;
use context_llm::SharedGateway;
use context_providers::{
    EmotionProvider, HotelSearchProvider, LlmPreferenceExtractor, LlmSocialProofExtractor,
    MemoCache, ReviewInsightProvider, SharedContextProvider, SocialProofProvider,
};
use ets_client::SharedHotelService;
use thiserror::Error;

/// Available provider names
pub const AVAILABLE_PROVIDERS: &[&str] = &[
    "ets_hotel_search",
    "emotion",
    "social_proof",
    "review_insight",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FactoryError {
    #[error("Unknown context provider '{name}'. Available: {}", AVAILABLE_PROVIDERS.join(", "))]
    UnknownProvider { name: String },
}

/// Collaborators shared by every provider the factory builds.
#[derive(Clone)]
pub struct ProviderServices {
    pub gateway: SharedGateway,
    pub hotel_service: SharedHotelService,
    pub cache_capacity: usize,
    pub cache_ttl: Option<Duration>,
}

impl ProviderServices {
    pub fn new(gateway: SharedGateway, hotel_service: SharedHotelService) -> Self {
        let defaults = Config::default();
        Self::from_config(gateway, hotel_service, &defaults)
    }

    pub fn from_config(
        gateway: SharedGateway,
        hotel_service: SharedHotelService,
        config: &Config,
    ) -> Self {
        Self {
            gateway,
            hotel_service,
            cache_capacity: config.insight_cache_capacity,
            cache_ttl: match config.insight_cache_ttl_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }

    fn cache<V: Clone>(&self) -> MemoCache<V> {
        MemoCache::new(self.cache_capacity, self.cache_ttl)
    }
}

/// Create a provider by name. Names are matched case-insensitively.
pub fn create_provider(
    name: &str,
    services: &ProviderServices,
) -> Result<SharedContextProvider, FactoryError> {
    let gateway = services.gateway.clone();
    let hotel_service = services.hotel_service.clone();

    match name.trim().to_ascii_lowercase().as_str() {
        "ets_hotel_search" | "hotel_search" => {
            Ok(Arc::new(HotelSearchProvider::new(gateway, hotel_service)))
        }

        "emotion" => Ok(Arc::new(EmotionProvider::new(gateway))),

        "social_proof" => {
            let extractor = LlmSocialProofExtractor::with_cache(gateway.clone(), services.cache());
            Ok(Arc::new(SocialProofProvider::with_extractors(
                Arc::new(extractor),
                Arc::new(LlmPreferenceExtractor::new(gateway)),
                hotel_service,
            )))
        }

        "review_insight" => Ok(Arc::new(
            ReviewInsightProvider::new(gateway, hotel_service).with_cache(services.cache()),
        )),

        _ => Err(FactoryError::UnknownProvider {
            name: name.to_string(),
        }),
    }
}

/// Create providers in the given order; fails on the first unknown name.
pub fn create_providers<S: AsRef<str>>(
    names: &[S],
    services: &ProviderServices,
) -> Result<Vec<SharedContextProvider>, FactoryError> {
    names
        .iter()
        .map(|name| create_provider(name.as_ref(), services))
        .collect()
}
