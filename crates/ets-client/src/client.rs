use async_trait::async_trait;
use context_core::Config;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde_json::Value;

use crate::error::{HotelServiceError, Result};
use crate::models::{extract_review_texts, HotelSearchRequest};
use crate::service::HotelService;

const DEFAULT_BASE_URL: &str = "https://www.etstur.com";

const SEARCH_PATH: &str = "/services/api/search/hotels";
const AUTOCOMPLETE_PATH: &str = "/v2/autocomplete";
const DETAIL_PATH: &str = "/services/api/hotel/detail";
const COMMENTS_PATH: &str = "/services/api/hotel/comments";
const REVIEWS_PATH: &str = "/services/api/hotel/reviews";

/// [`HotelService`] talking to the ETS web API.
pub struct EtsHotelClient {
    client: Client,
    base_url: String,
}

impl Default for EtsHotelClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EtsHotelClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Uses `ets_base_url` from the config when set; rejects values that are not http(s) URLs.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::new();
        match config.ets_base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                validate_base_url(url)?;
                Ok(client.with_base_url(url))
            }
            _ => Ok(client),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .client
            .get(self.endpoint(path))
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        read_json(path, response).await
    }
}

fn validate_base_url(url: &str) -> Result<()> {
    let parsed =
        reqwest::Url::parse(url).map_err(|e| HotelServiceError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(HotelServiceError::InvalidUrl(format!(
            "{url}: unsupported scheme '{scheme}'"
        ))),
    }
}

async fn read_json(path: &str, response: Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        log::warn!("Hotel API {} returned HTTP {}", path, status);
        return Err(HotelServiceError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    log::debug!("Hotel API {} returned {} bytes", path, text.len());
    Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl HotelService for EtsHotelClient {
    async fn search_hotels(&self, request: &HotelSearchRequest) -> Result<Value> {
        log::info!(
            "Searching hotels: url={}, check_in={:?}, check_out={:?}, adults={}, children={}",
            request.url,
            request.check_in_date,
            request.check_out_date,
            request.adult_count,
            request.child_count
        );

        let response = self
            .client
            .post(self.endpoint(SEARCH_PATH))
            .json(request)
            .send()
            .await?;

        read_json(SEARCH_PATH, response).await
    }

    async fn autocomplete(&self, query: &str) -> Result<Option<String>> {
        let json = self.get_json(AUTOCOMPLETE_PATH, &[("q", query)]).await?;

        let slug = json
            .pointer("/result/0/url")
            .and_then(Value::as_str)
            .map(str::to_string);

        match &slug {
            Some(url) => log::debug!("Autocomplete resolved {:?} to {}", query, url),
            None => log::debug!("Autocomplete found no match for {:?}", query),
        }

        Ok(slug)
    }

    async fn fetch_hotel_detail(&self, hotel_url: &str) -> Result<Value> {
        self.get_json(DETAIL_PATH, &[("url", hotel_url)]).await
    }

    async fn fetch_comments(&self, hotel_url: &str) -> Result<Vec<String>> {
        let json = self.get_json(COMMENTS_PATH, &[("url", hotel_url)]).await?;
        Ok(extract_review_texts(&json))
    }

    async fn fetch_hotel_reviews(&self, hotel_code: &str, offset: u32) -> Result<Value> {
        let offset = offset.to_string();
        self.get_json(
            REVIEWS_PATH,
            &[("hotelCode", hotel_code), ("offset", offset.as_str())],
        )
        .await
    }
}
