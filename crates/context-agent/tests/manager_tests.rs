//! Dispatcher behaviour with fake providers and a scripted gateway

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use context_agent::{
    fetch_review_insight, ContextAgentManager, ContextFragment, ContextProvider, ContextRequest,
    DispatchMode, Selection,
};
use context_llm::{LLMError, TRAVEL_GUIDE_SYSTEM_PROMPT};
use context_providers::emotion::EMOTION_SYSTEM_PROMPT;
use context_providers::review_insight::REVIEW_INSIGHT_SYSTEM_PROMPT;
use context_providers::testing::{FailingGateway, FakeHotelService, ScriptedGateway};
use context_providers::{EmotionProvider, HotelSearchProvider, ProviderError, ReviewInsightProvider};
use ets_client::HotelServiceError;
use serde_json::json;

struct StaticProvider {
    context_type: &'static str,
    delay: Duration,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticProvider {
    fn ok(context_type: &'static str) -> Self {
        Self {
            context_type,
            delay: Duration::ZERO,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(context_type: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::ok(context_type)
        }
    }

    fn delayed(context_type: &'static str, millis: u64) -> Self {
        Self {
            delay: Duration::from_millis(millis),
            ..Self::ok(context_type)
        }
    }
}

#[async_trait]
impl ContextProvider for StaticProvider {
    fn context_type(&self) -> &str {
        self.context_type
    }

    async fn provide_context(
        &self,
        request: &ContextRequest,
    ) -> Result<ContextFragment, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail {
            return Err(ProviderError::HotelService(HotelServiceError::Status {
                status: 504,
                body: "gateway timeout".to_string(),
            }));
        }

        Ok(ContextFragment::new(
            self.context_type,
            json!({"prompt": request.prompt, "hotel": request.selection.hotel_code}),
        ))
    }
}

fn types(fragments: &[ContextFragment]) -> Vec<&str> {
    fragments.iter().map(|f| f.context_type.as_str()).collect()
}

#[tokio::test]
async fn failing_provider_is_left_out() {
    let manager = ContextAgentManager::new(Arc::new(ScriptedGateway::new()));
    manager.register_provider(StaticProvider::ok("emotion"));
    manager.register_provider(StaticProvider::failing("ets_hotel_search"));
    manager.register_provider(StaticProvider::ok("social_proof"));

    let fragments = manager.respond_with_contexts("I need a break").await;

    assert_eq!(types(&fragments), vec!["emotion", "social_proof"]);
    assert_eq!(fragments[0].data["prompt"], "I need a break");

    let outcomes = manager
        .collect_outcomes(&ContextRequest::new("I need a break"))
        .await;
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_success());
    assert!(!outcomes[1].is_success());
    assert_eq!(outcomes[1].context_type, "ets_hotel_search");
}

#[tokio::test]
async fn non_ascii_prose_reply_only_drops_its_provider() {
    for mode in [DispatchMode::Sequential, DispatchMode::Concurrent] {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .reply(EMOTION_SYSTEM_PROMPT, "```Bu ürün için duygu tespit edilemedi```")
                .reply(REVIEW_INSIGHT_SYSTEM_PROMPT, r#"{"averageScore": 91}"#),
        );
        let service = Arc::new(
            FakeHotelService::new().with_reviews(json!({"reviews": [{"reviewText": "Harika"}]})),
        );

        let manager = ContextAgentManager::new(gateway.clone()).with_dispatch_mode(mode);
        manager.register_provider(ReviewInsightProvider::new(gateway.clone(), service));
        manager.register_provider(EmotionProvider::new(gateway));

        let request = ContextRequest::new("Bu otel nasıl?")
            .with_selection(Selection::hotel_code("CLVOBE"));
        let fragments = manager.respond_with_contexts_for(&request).await;

        assert_eq!(types(&fragments), vec!["review_insight"]);
        assert_eq!(fragments[0].data["hotelCode"], "CLVOBE");
        assert_eq!(fragments[0].data["averageScore"], 91.0);
    }
}

#[tokio::test]
async fn concurrent_mode_keeps_registration_order() {
    let manager = ContextAgentManager::new(Arc::new(ScriptedGateway::new()))
        .with_dispatch_mode(DispatchMode::Concurrent);
    manager.register_provider(StaticProvider::delayed("slow", 60));
    manager.register_provider(StaticProvider::delayed("medium", 30));
    manager.register_provider(StaticProvider::ok("fast"));

    let fragments = manager.respond_with_contexts("order?").await;

    assert_eq!(types(&fragments), vec!["slow", "medium", "fast"]);
}

#[tokio::test]
async fn concurrent_mode_overlaps_providers() {
    let manager = ContextAgentManager::new(Arc::new(ScriptedGateway::new()))
        .with_dispatch_mode(DispatchMode::Concurrent);
    for _ in 0..4 {
        manager.register_provider(StaticProvider::delayed("wait", 100));
    }

    let started = tokio::time::Instant::now();
    let fragments = manager.respond_with_contexts("parallel").await;

    assert_eq!(fragments.len(), 4);
    assert!(started.elapsed() < Duration::from_millis(350));
}

#[tokio::test]
async fn duplicate_types_contribute_twice() {
    let manager = ContextAgentManager::new(Arc::new(ScriptedGateway::new()));
    manager.register_provider(StaticProvider::ok("emotion"));
    manager.register_provider(StaticProvider::ok("emotion"));

    assert_eq!(manager.context_types(), vec!["emotion", "emotion"]);
    assert_eq!(manager.respond_with_contexts("hi").await.len(), 2);
}

#[tokio::test]
async fn reset_clears_registry() {
    let provider = Arc::new(StaticProvider::ok("emotion"));
    let manager = ContextAgentManager::new(Arc::new(ScriptedGateway::new()));
    manager.register_shared(provider.clone());
    assert_eq!(manager.provider_count(), 1);

    manager.reset_providers();

    assert_eq!(manager.provider_count(), 0);
    assert!(manager.respond_with_contexts("hi").await.is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn respond_forwards_contexts_to_gateway() {
    let gateway =
        Arc::new(ScriptedGateway::new().reply(TRAVEL_GUIDE_SYSTEM_PROMPT, "Take the spa hotel."));
    let manager = ContextAgentManager::new(gateway.clone());
    manager.register_provider(StaticProvider::ok("emotion"));
    manager.register_provider(StaticProvider::failing("ets_hotel_search"));

    let answer = manager.respond("I need a break").await.unwrap();

    assert_eq!(answer, "Take the spa hotel.");
    let prompts = gateway.user_prompts_with(TRAVEL_GUIDE_SYSTEM_PROMPT);
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("User Prompt: I need a break"));
    assert!(prompts[0].contains("\"type\": \"emotion\""));
    assert!(!prompts[0].contains("ets_hotel_search"));
}

#[tokio::test]
async fn answer_without_any_context() {
    let gateway =
        Arc::new(ScriptedGateway::new().reply(TRAVEL_GUIDE_SYSTEM_PROMPT, "Try Antalya."));
    let manager = ContextAgentManager::new(gateway);
    manager.register_provider(StaticProvider::failing("emotion"));
    manager.register_provider(StaticProvider::failing("social_proof"));

    assert_eq!(manager.respond("anywhere warm").await.unwrap(), "Try Antalya.");
}

#[tokio::test]
async fn gateway_failure_propagates() {
    let gateway = Arc::new(FailingGateway::new(503));
    let manager = ContextAgentManager::new(gateway.clone());
    manager.register_provider(StaticProvider::ok("emotion"));

    let err = manager.respond("hello").await.unwrap_err();

    assert!(matches!(err, LLMError::Api { status: 503, .. }));
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn hotel_search_scenario() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .otherwise(r#"{"location": "Ankara", "adultCount": 2, "checkInDate": "2999-01-10"}"#)
            .reply(TRAVEL_GUIDE_SYSTEM_PROMPT, "No hotels matched, try other dates."),
    );
    let service = Arc::new(
        FakeHotelService::new()
            .with_location("Ankara", "Ankara-Otelleri")
            .with_search_result(json!({"hotels": []})),
    );

    let manager = ContextAgentManager::new(gateway.clone());
    manager.register_provider(HotelSearchProvider::new(gateway.clone(), service.clone()));

    let prompt = "hotel in Ankara next weekend for 2 adults";
    let fragments = manager.respond_with_contexts(prompt).await;
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].context_type, "ets_hotel_search");
    assert!(fragments[0].data["hotels"].is_array());

    let answer = manager.respond(prompt).await.unwrap();
    assert!(!answer.is_empty());
    assert_eq!(service.recorded_searches()[0].url, "Ankara-Otelleri");
}

#[tokio::test]
async fn selection_travels_with_request() {
    let manager = ContextAgentManager::new(Arc::new(ScriptedGateway::new()));
    manager.register_provider(StaticProvider::ok("review_insight"));

    let request = ContextRequest::new("reviews?").with_selection(Selection::hotel_code("CLVOBE"));
    let fragments = manager.respond_with_contexts_for(&request).await;

    assert_eq!(fragments[0].data["hotel"], "CLVOBE");
}

#[tokio::test]
async fn fetch_review_insight_reads_fragment() {
    let gateway = Arc::new(ScriptedGateway::new().reply(
        REVIEW_INSIGHT_SYSTEM_PROMPT,
        r#"{"averageScore": 88, "recommendationRate": 0.9}"#,
    ));
    let service = Arc::new(
        FakeHotelService::new().with_reviews(json!({"reviews": [{"reviewText": "Lovely staff"}]})),
    );

    let manager = ContextAgentManager::new(gateway.clone());
    manager.register_provider(ReviewInsightProvider::new(gateway, service));

    let insights = fetch_review_insight(&manager, "CLVOBE", "is it worth it?")
        .await
        .unwrap();
    assert_eq!(insights.hotel_code.as_deref(), Some("CLVOBE"));
    assert_eq!(insights.average_score, Some(88.0));
    assert_eq!(insights.recommendation_rate, Some(0.9));
}

#[tokio::test]
async fn fetch_review_insight_without_provider_is_none() {
    let manager = ContextAgentManager::new(Arc::new(ScriptedGateway::new()));
    manager.register_provider(StaticProvider::ok("emotion"));

    assert!(fetch_review_insight(&manager, "CLVOBE", "hi").await.is_none());
}
