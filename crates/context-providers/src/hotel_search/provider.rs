use std::sync::Arc;

use async_trait::async_trait;
use context_core::ContextFragment;
use context_llm::SharedGateway;
use ets_client::{SharedHotelService, DEFAULT_LOCATION_SLUG};

use super::parser::{HotelQueryParser, HotelQueryParsing};
use super::query::HotelSearchQuery;
use crate::error::{ProviderError, Result};
use crate::provider::{ContextProvider, ContextRequest};

pub const HOTEL_SEARCH_CONTEXT: &str = "ets_hotel_search";

/// Fragment data is the raw search payload, so consumers see whatever the API returned.
pub struct HotelSearchProvider {
    parser: Arc<dyn HotelQueryParsing>,
    hotel_service: SharedHotelService,
}

impl HotelSearchProvider {
    pub fn new(gateway: SharedGateway, hotel_service: SharedHotelService) -> Self {
        Self::with_parser(Arc::new(HotelQueryParser::new(gateway)), hotel_service)
    }

    pub fn with_parser(
        parser: Arc<dyn HotelQueryParsing>,
        hotel_service: SharedHotelService,
    ) -> Self {
        Self {
            parser,
            hotel_service,
        }
    }

    async fn resolve_location(&self, query: &HotelSearchQuery) -> Result<String> {
        match query.location_text() {
            Some(location) => self
                .hotel_service
                .autocomplete(location)
                .await?
                .ok_or_else(|| ProviderError::LocationNotFound(location.to_string())),
            None => {
                let slug = query.url_slug().unwrap_or(DEFAULT_LOCATION_SLUG);
                log::debug!("No location in query, searching {}", slug);
                Ok(slug.to_string())
            }
        }
    }
}

#[async_trait]
impl ContextProvider for HotelSearchProvider {
    fn context_type(&self) -> &str {
        HOTEL_SEARCH_CONTEXT
    }

    async fn provide_context(&self, request: &ContextRequest) -> Result<ContextFragment> {
        let query = self.parser.parse(&request.prompt).await?.with_validated_dates();
        let slug = self.resolve_location(&query).await?;

        let search = query.to_search_request(&slug);
        let result = self.hotel_service.search_hotels(&search).await?;
        log::info!("Hotel search for {} completed", slug);

        Ok(ContextFragment::new(HOTEL_SEARCH_CONTEXT, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHotelService, ScriptedGateway};
    use ets_client::HotelServiceError;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn provider(reply: &str, service: Arc<FakeHotelService>) -> HotelSearchProvider {
        let gateway = Arc::new(ScriptedGateway::new().otherwise(reply));
        HotelSearchProvider::new(gateway, service)
    }

    #[tokio::test]
    async fn searches_resolved_location() {
        let payload = json!({"result": {"hotels": [{"hotelName": "Ankara Palas"}]}});
        let service = Arc::new(
            FakeHotelService::new()
                .with_location("Ankara", "Ankara-Otelleri")
                .with_search_result(payload.clone()),
        );
        let provider = provider(
            r#"{"location": "Ankara", "checkInDate": "2999-05-16", "checkOutDate": "2000-05-18", "adultCount": 2}"#,
            service.clone(),
        );

        let fragment = provider
            .provide_context(&ContextRequest::new("hotel in Ankara next weekend for 2 adults"))
            .await
            .unwrap();

        assert_eq!(fragment.context_type, HOTEL_SEARCH_CONTEXT);
        assert_eq!(fragment.data, payload);

        let searches = service.recorded_searches();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].url, "Ankara-Otelleri");
        assert_eq!(searches[0].check_in_date, "2999-05-16");
        assert_eq!(searches[0].check_out_date, "");
        assert_eq!(searches[0].adult_count, 2);
    }

    #[tokio::test]
    async fn unknown_location_fails() {
        let service = Arc::new(FakeHotelService::new());
        let provider = provider(r#"{"location": "Atlantis"}"#, service.clone());

        let err = provider
            .provide_context(&ContextRequest::new("hotel in Atlantis"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::LocationNotFound(ref l) if l == "Atlantis"));
        assert!(service.recorded_searches().is_empty());
    }

    #[tokio::test]
    async fn missing_location_uses_general_slug() {
        let service = Arc::new(FakeHotelService::new());
        let provider = provider(r#"{"adultCount": 1}"#, service.clone());

        provider
            .provide_context(&ContextRequest::new("any hotel"))
            .await
            .unwrap();

        assert_eq!(service.autocomplete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.recorded_searches()[0].url, DEFAULT_LOCATION_SLUG);
    }

    #[tokio::test]
    async fn hotel_service_failure_is_typed() {
        let service = Arc::new(FakeHotelService::new().failing(502));
        let provider = provider(r#"{"location": "Izmir"}"#, service);

        let err = provider
            .provide_context(&ContextRequest::new("hotel in Izmir"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::HotelService(HotelServiceError::Status { status: 502, .. })
        ));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn prose_reply_is_extraction_error() {
        let service = Arc::new(FakeHotelService::new());
        let provider = provider("Sorry, I can't help with that.", service.clone());

        let err = provider
            .provide_context(&ContextRequest::new("hotel"))
            .await
            .unwrap_err();

        assert!(err.is_extraction());
        assert_eq!(service.autocomplete_calls.load(Ordering::SeqCst), 0);
    }
}
