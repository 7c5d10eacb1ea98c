use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use context_core::date::DATE_FORMAT;
use context_core::parse_model_json;
use context_llm::SharedGateway;

use super::query::HotelSearchQuery;
use crate::error::Result;

/// System prompt for query extraction. Relative dates ("next weekend") need today's date.
pub fn hotel_query_system_prompt(today: NaiveDate) -> String {
    format!(
        "\
Today is {today}. Analyze the user's hotel request and extract a structured query.

Respond ONLY with a JSON object of this shape, using null for anything not mentioned:

{{
  \"location\": \"Antalya\",
  \"type\": \"hotel\" | \"villa\" | \"apart\" | null,
  \"checkInMonth\": \"June\" | null,
  \"checkInDate\": \"YYYY-MM-DD\" | null,
  \"checkOutDate\": \"YYYY-MM-DD\" | null,
  \"adultCount\": 2,
  \"childCount\": 0,
  \"childAges\": [],
  \"url\": null,
  \"priceConcern\": true | false | null,
  \"amenities\": [\"pool\"] | null,
  \"starRating\": 5 | null,
  \"proximity\": \"beach\" | null
}}

Rules:
- Resolve relative dates against today's date; never return a date in the past.
- Only return valid JSON. No explanation.",
        today = today.format(DATE_FORMAT)
    )
}

/// Turns a prompt into a [`HotelSearchQuery`].
#[async_trait]
pub trait HotelQueryParsing: Send + Sync {
    async fn parse(&self, prompt: &str) -> Result<HotelSearchQuery>;
}

pub struct HotelQueryParser {
    gateway: SharedGateway,
}

impl HotelQueryParser {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl HotelQueryParsing for HotelQueryParser {
    async fn parse(&self, prompt: &str) -> Result<HotelSearchQuery> {
        let system_prompt = hotel_query_system_prompt(Utc::now().date_naive());
        let raw = self.gateway.send(&system_prompt, prompt).await?;

        let query: HotelSearchQuery = parse_model_json(&raw)?;
        log::debug!("Parsed hotel query: {:?}", query);
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;
    use std::sync::Arc;

    #[test]
    fn system_prompt_mentions_today() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let prompt = hotel_query_system_prompt(today);
        assert!(prompt.starts_with("Today is 2025-05-10."));
        assert!(prompt.contains("\"checkInDate\""));
    }

    #[tokio::test]
    async fn parses_fenced_reply() {
        let gateway = Arc::new(
            ScriptedGateway::new().otherwise("```json\n{\"location\": \"Ankara\", \"adultCount\": 2}\n```"),
        );
        let parser = HotelQueryParser::new(gateway.clone());

        let query = parser.parse("hotel in Ankara for 2 adults").await.unwrap();
        assert_eq!(query.location.as_deref(), Some("Ankara"));
        assert_eq!(query.adult_count, Some(2));
        assert_eq!(gateway.call_count(), 1);
    }
}
