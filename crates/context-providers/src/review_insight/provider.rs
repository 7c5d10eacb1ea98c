use std::sync::Arc;

use async_trait::async_trait;
use context_core::ContextFragment;
use context_llm::SharedGateway;
use ets_client::{extract_review_texts, SharedHotelService};

use super::extractor::{LlmReviewInsightExtractor, ReviewInsightExtractor};
use super::models::ReviewInsights;
use crate::cache::MemoCache;
use crate::error::Result;
use crate::provider::{to_fragment_data, ContextProvider, ContextRequest};

pub const REVIEW_INSIGHT_CONTEXT: &str = "review_insight";

/// Needs `selection.hotel_code`; without one the fragment is empty.
/// Insights are memoized per hotel code, so a cached code fetches no reviews.
pub struct ReviewInsightProvider {
    extractor: Arc<dyn ReviewInsightExtractor>,
    hotel_service: SharedHotelService,
    cache: MemoCache<ReviewInsights>,
}

impl ReviewInsightProvider {
    pub fn new(gateway: SharedGateway, hotel_service: SharedHotelService) -> Self {
        Self::with_extractor(Arc::new(LlmReviewInsightExtractor::new(gateway)), hotel_service)
    }

    pub fn with_extractor(
        extractor: Arc<dyn ReviewInsightExtractor>,
        hotel_service: SharedHotelService,
    ) -> Self {
        Self {
            extractor,
            hotel_service,
            cache: MemoCache::default(),
        }
    }

    pub fn with_cache(mut self, cache: MemoCache<ReviewInsights>) -> Self {
        self.cache = cache;
        self
    }

    /// Insights for one hotel code, from the cache when possible.
    pub async fn insights_for(&self, hotel_code: &str) -> Result<ReviewInsights> {
        if let Some(cached) = self.cache.get(hotel_code).await {
            log::debug!("Review insight cache hit for {}", hotel_code);
            return Ok(cached);
        }

        let raw = self.hotel_service.fetch_hotel_reviews(hotel_code, 0).await?;
        let reviews = extract_review_texts(&raw);

        if reviews.is_empty() {
            log::info!("No reviews found for {}, skipping model call", hotel_code);
            return Ok(ReviewInsights::without_reviews(hotel_code));
        }

        let insights = self
            .extractor
            .fetch_review_insights(hotel_code, &reviews)
            .await?;
        self.cache.insert(hotel_code, insights.clone()).await;
        Ok(insights)
    }
}

#[async_trait]
impl ContextProvider for ReviewInsightProvider {
    fn context_type(&self) -> &str {
        REVIEW_INSIGHT_CONTEXT
    }

    async fn provide_context(&self, request: &ContextRequest) -> Result<ContextFragment> {
        let Some(hotel_code) = request.selection.hotel_code.as_deref() else {
            log::warn!("Review insight requested without a selected hotel code");
            return Ok(ContextFragment::empty(REVIEW_INSIGHT_CONTEXT));
        };

        let insights = self.insights_for(hotel_code).await?;
        Ok(ContextFragment::new(REVIEW_INSIGHT_CONTEXT, to_fragment_data(&insights)?))
    }
}
