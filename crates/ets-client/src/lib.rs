//! ets-client - HTTP client for the ETS hotel search API
//!
//! - `service` - the HotelService trait consumed by context providers
//! - `client` - reqwest implementation against the public endpoints
//! - `models` - search request and tolerant hotel DTOs

pub mod client;
pub mod error;
pub mod models;
pub mod service;

pub use client::EtsHotelClient;
pub use error::{HotelServiceError, Result};
pub use models::{
    extract_review_texts, hotels_from_search_data, Hotel, HotelSearchRequest, HotelSearchResponse,
    Room, DEFAULT_LOCATION_SLUG,
};
pub use service::{HotelService, SharedHotelService};
