use context_core::json::{lenient, lenient_count, lenient_f64, lenient_seq};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Search-category slug used when no location could be resolved.
pub const DEFAULT_LOCATION_SLUG: &str = "Genel-Otelleri";

const DEFAULT_CURRENCY: &str = "TRY";
const DEFAULT_LIMIT: u32 = 20;

/// Body of `POST /services/api/search/hotels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchRequest {
    /// `YYYY-MM-DD`, empty when unknown.
    pub check_in_date: String,
    pub check_out_date: String,
    pub adult_count: u32,
    pub child_count: u32,
    pub child_ages: Vec<u32>,
    /// Search-category slug from autocomplete.
    pub url: String,
    pub currency: String,
    pub limit: u32,
    pub offset: u32,
}

impl HotelSearchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            check_in_date: String::new(),
            check_out_date: String::new(),
            adult_count: 0,
            child_count: 0,
            child_ages: Vec::new(),
            url: url.into(),
            currency: DEFAULT_CURRENCY.to_string(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Default for HotelSearchRequest {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION_SLUG)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchResponse {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub hotels: Option<Vec<Hotel>>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_hotel_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_hotel_count_without_filters: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    #[serde(default, deserialize_with = "lenient")]
    pub hotel_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hotel_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hotel_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub locations: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub rooms: Option<Vec<Room>>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub comment_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
}

impl Hotel {
    /// Cheapest room price, if any room carries one.
    pub fn lowest_price(&self) -> Option<f64> {
        self.rooms
            .as_deref()?
            .iter()
            .filter_map(|room| room.price)
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(default, deserialize_with = "lenient")]
    pub room_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub board_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub discount_rate: Option<f64>,
}

/// Hotels in a search payload, found under `result.hotels` or `hotels`.
/// Entries that do not look like a hotel are skipped.
pub fn hotels_from_search_data(data: &Value) -> Vec<Hotel> {
    let hotels = data
        .pointer("/result/hotels")
        .or_else(|| data.get("hotels"))
        .and_then(Value::as_array);

    match hotels {
        Some(items) => items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        None => Vec::new(),
    }
}

const TEXT_KEYS: &[&str] = &["comment", "reviewText", "text", "content"];
const LIST_KEYS: &[&str] = &["result", "reviews", "comments", "items"];

/// Reduces a comments or reviews payload to the review texts it carries.
///
/// Accepts plain string arrays, arrays of objects with a `comment` / `reviewText` /
/// `text` / `content` field, and either of those nested under `result`, `reviews`,
/// `comments` or `items`.
pub fn extract_review_texts(value: &Value) -> Vec<String> {
    let mut texts = Vec::new();
    collect_texts(value, &mut texts);
    texts
}

fn collect_texts(value: &Value, texts: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(s) => push_text(s, texts),
                    Value::Object(map) => {
                        let text = TEXT_KEYS
                            .iter()
                            .find_map(|key| map.get(*key).and_then(Value::as_str));
                        match text {
                            Some(s) => push_text(s, texts),
                            None => collect_texts(item, texts),
                        }
                    }
                    _ => {}
                }
            }
        }
        Value::Object(map) => {
            for key in LIST_KEYS {
                if let Some(inner) = map.get(*key) {
                    collect_texts(inner, texts);
                }
            }
        }
        _ => {}
    }
}

fn push_text(text: &str, texts: &mut Vec<String>) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        texts.push(trimmed.to_string());
    }
}
