//! Fakes for the gateway and the hotel service, shared with dependent crates'
//! tests through the `testing` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use context_llm::{LLMError, LLMGateway};
use ets_client::{HotelSearchRequest, HotelService, HotelServiceError};
use serde_json::{json, Value};

/// Gateway that answers `send` with a canned reply chosen by system prompt.
///
/// `complete` goes through the default trait method, so it lands here with the
/// travel-guide system prompt.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: HashMap<String, String>,
    fallback: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, system_prompt: &str, reply: impl Into<String>) -> Self {
        self.replies.insert(system_prompt.to_string(), reply.into());
        self
    }

    /// Reply used for any system prompt without a scripted answer.
    pub fn otherwise(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    pub fn calls_with(&self, system_prompt: &str) -> usize {
        self.lock_calls()
            .iter()
            .filter(|(system, _)| system == system_prompt)
            .count()
    }

    pub fn user_prompts_with(&self, system_prompt: &str) -> Vec<String> {
        self.lock_calls()
            .iter()
            .filter(|(system, _)| system == system_prompt)
            .map(|(_, user)| user.clone())
            .collect()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(String, String)>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LLMGateway for ScriptedGateway {
    async fn send(&self, system_prompt: &str, user_prompt: &str) -> context_llm::Result<String> {
        self.lock_calls()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        self.replies
            .get(system_prompt)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or(LLMError::EmptyResponse)
    }
}

/// Gateway whose every call fails with an API error.
pub struct FailingGateway {
    pub status: u16,
    pub calls: AtomicUsize,
}

impl FailingGateway {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LLMGateway for FailingGateway {
    async fn send(&self, _system_prompt: &str, _user_prompt: &str) -> context_llm::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LLMError::Api {
            status: self.status,
            body: "upstream unavailable".to_string(),
        })
    }
}

/// In-memory hotel service with per-operation call counters.
pub struct FakeHotelService {
    pub locations: HashMap<String, String>,
    pub search_result: Value,
    pub detail: Value,
    pub comments: Vec<String>,
    pub reviews: Value,
    pub fail_with_status: Option<u16>,
    pub searches: Mutex<Vec<HotelSearchRequest>>,
    pub autocomplete_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub comment_calls: AtomicUsize,
    pub review_calls: AtomicUsize,
}

impl Default for FakeHotelService {
    fn default() -> Self {
        Self {
            locations: HashMap::new(),
            search_result: json!({"result": {"hotels": []}}),
            detail: json!({}),
            comments: Vec::new(),
            reviews: json!({"reviews": []}),
            fail_with_status: None,
            searches: Mutex::new(Vec::new()),
            autocomplete_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            comment_calls: AtomicUsize::new(0),
            review_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeHotelService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, query: &str, slug: &str) -> Self {
        self.locations.insert(query.to_string(), slug.to_string());
        self
    }

    pub fn with_search_result(mut self, result: Value) -> Self {
        self.search_result = result;
        self
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_comments<I, S>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comments = comments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reviews(mut self, reviews: Value) -> Self {
        self.reviews = reviews;
        self
    }

    pub fn failing(mut self, status: u16) -> Self {
        self.fail_with_status = Some(status);
        self
    }

    pub fn recorded_searches(&self) -> Vec<HotelSearchRequest> {
        self.searches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn check(&self) -> ets_client::Result<()> {
        match self.fail_with_status {
            Some(status) => Err(HotelServiceError::Status {
                status,
                body: "service unavailable".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl HotelService for FakeHotelService {
    async fn search_hotels(&self, request: &HotelSearchRequest) -> ets_client::Result<Value> {
        self.check()?;
        self.searches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        Ok(self.search_result.clone())
    }

    async fn autocomplete(&self, query: &str) -> ets_client::Result<Option<String>> {
        self.autocomplete_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.locations.get(query).cloned())
    }

    async fn fetch_hotel_detail(&self, _hotel_url: &str) -> ets_client::Result<Value> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.detail.clone())
    }

    async fn fetch_comments(&self, _hotel_url: &str) -> ets_client::Result<Vec<String>> {
        self.comment_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.comments.clone())
    }

    async fn fetch_hotel_reviews(
        &self,
        _hotel_code: &str,
        _offset: u32,
    ) -> ets_client::Result<Value> {
        self.review_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.reviews.clone())
    }
}
