use std::sync::Arc;

use async_trait::async_trait;
use context_core::ContextFragment;
use context_llm::SharedGateway;
use ets_client::SharedHotelService;
use serde_json::json;

use super::extractor::{LlmSocialProofExtractor, SocialProofExtractor};
use crate::error::Result;
use crate::preferences::{LlmPreferenceExtractor, PreferenceExtractor};
use crate::provider::{to_fragment_data, ContextProvider, ContextRequest};

pub const SOCIAL_PROOF_CONTEXT: &str = "social_proof";

/// Needs `selection.hotel_url`; without one the fragment is empty.
///
/// Fragment data: `{"socialProof": .., "hotelDetail": .., "preferences": ..}`.
pub struct SocialProofProvider {
    extractor: Arc<dyn SocialProofExtractor>,
    preferences: Arc<dyn PreferenceExtractor>,
    hotel_service: SharedHotelService,
}

impl SocialProofProvider {
    pub fn new(gateway: SharedGateway, hotel_service: SharedHotelService) -> Self {
        Self::with_extractors(
            Arc::new(LlmSocialProofExtractor::new(gateway.clone())),
            Arc::new(LlmPreferenceExtractor::new(gateway)),
            hotel_service,
        )
    }

    pub fn with_extractors(
        extractor: Arc<dyn SocialProofExtractor>,
        preferences: Arc<dyn PreferenceExtractor>,
        hotel_service: SharedHotelService,
    ) -> Self {
        Self {
            extractor,
            preferences,
            hotel_service,
        }
    }
}

#[async_trait]
impl ContextProvider for SocialProofProvider {
    fn context_type(&self) -> &str {
        SOCIAL_PROOF_CONTEXT
    }

    async fn provide_context(&self, request: &ContextRequest) -> Result<ContextFragment> {
        let Some(hotel_url) = request.selection.hotel_url.as_deref() else {
            log::warn!("Social proof requested without a selected hotel URL");
            return Ok(ContextFragment::empty(SOCIAL_PROOF_CONTEXT));
        };

        let detail = self.hotel_service.fetch_hotel_detail(hotel_url).await?;
        let comments = self.hotel_service.fetch_comments(hotel_url).await?;
        log::debug!("Fetched {} comments for {}", comments.len(), hotel_url);

        // preferences only sharpen the summary, so a bad extraction is not fatal
        let preferences = match self.preferences.extract_preferences(&request.prompt).await {
            Ok(preferences) => Some(preferences),
            Err(e) => {
                log::warn!("Preference extraction failed: {}", e);
                None
            }
        };

        let proof = self
            .extractor
            .fetch_social_proof(hotel_url, &comments, preferences.as_ref())
            .await?;

        Ok(ContextFragment::new(
            SOCIAL_PROOF_CONTEXT,
            json!({
                "socialProof": to_fragment_data(&proof)?,
                "hotelDetail": detail,
                "preferences": to_fragment_data(&preferences)?,
            }),
        ))
    }
}
