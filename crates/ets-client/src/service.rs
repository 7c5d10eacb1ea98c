use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::HotelSearchRequest;

/// Contract surface of the hotel API used by the context providers.
#[async_trait]
pub trait HotelService: Send + Sync {
    /// Runs a hotel search and returns the raw response payload.
    async fn search_hotels(&self, request: &HotelSearchRequest) -> Result<Value>;

    /// Resolves free text ("Ankara", "Bodrum villas") to a search-category URL slug.
    /// `None` when the API has no match.
    async fn autocomplete(&self, query: &str) -> Result<Option<String>>;

    /// Detail blob for the hotel at `hotel_url`.
    async fn fetch_hotel_detail(&self, hotel_url: &str) -> Result<Value>;

    /// Guest comment texts for the hotel at `hotel_url`.
    async fn fetch_comments(&self, hotel_url: &str) -> Result<Vec<String>>;

    /// Raw review page for the hotel identified by `hotel_code`.
    async fn fetch_hotel_reviews(&self, hotel_code: &str, offset: u32) -> Result<Value>;
}

pub type SharedHotelService = Arc<dyn HotelService>;
