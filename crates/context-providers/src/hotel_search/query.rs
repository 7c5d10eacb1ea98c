use context_core::date::validate_optional_date;
use context_core::json::{lenient, lenient_count, lenient_seq};
use ets_client::HotelSearchRequest;
use serde::{Deserialize, Serialize};

/// Search intent extracted from a prompt. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchQuery {
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    /// Accommodation kind, e.g. "villa" or "hotel".
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub accommodation_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub check_in_month: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub check_in_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub check_out_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub adult_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub child_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub child_ages: Option<Vec<u32>>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_concern: Option<bool>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub star_rating: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub proximity: Option<String>,
}

impl HotelSearchQuery {
    /// Drops check-in/check-out dates that are malformed or already past.
    pub fn with_validated_dates(mut self) -> Self {
        self.check_in_date = validate_optional_date(self.check_in_date.as_deref());
        self.check_out_date = validate_optional_date(self.check_out_date.as_deref());
        self
    }

    /// Trimmed, non-empty location text.
    pub fn location_text(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }

    pub fn url_slug(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    /// Search request for the resolved location slug, with the API defaults for anything missing.
    pub fn to_search_request(&self, slug: &str) -> HotelSearchRequest {
        HotelSearchRequest {
            check_in_date: self.check_in_date.clone().unwrap_or_default(),
            check_out_date: self.check_out_date.clone().unwrap_or_default(),
            adult_count: self.adult_count.unwrap_or(0),
            child_count: self.child_count.unwrap_or(0),
            child_ages: self.child_ages.clone().unwrap_or_default(),
            ..HotelSearchRequest::new(slug)
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_partial_and_malformed_fields() {
        let query: HotelSearchQuery = serde_json::from_value(json!({
            "location": "Ankara",
            "type": "hotel",
            "adultCount": "2",
            "childCount": -1,
            "childAges": [4, "seven", 9],
            "priceConcern": "yes",
            "starRating": 4.0,
            "amenities": ["pool", 3, "spa"]
        }))
        .unwrap();

        assert_eq!(query.location.as_deref(), Some("Ankara"));
        assert_eq!(query.accommodation_type.as_deref(), Some("hotel"));
        assert_eq!(query.adult_count, Some(2));
        assert_eq!(query.child_count, None);
        assert_eq!(query.child_ages, Some(vec![4, 9]));
        assert_eq!(query.price_concern, None);
        assert_eq!(query.star_rating, Some(4));
        assert_eq!(query.amenities, Some(vec!["pool".to_string(), "spa".to_string()]));
        assert_eq!(query.check_in_date, None);
    }

    #[test]
    fn empty_object_is_an_empty_query() {
        let query: HotelSearchQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query, HotelSearchQuery::default());
        assert_eq!(query.location_text(), None);
    }

    #[test]
    fn past_dates_are_dropped() {
        let query = HotelSearchQuery {
            check_in_date: Some("2001-01-01".to_string()),
            check_out_date: Some("2999-01-03".to_string()),
            ..HotelSearchQuery::default()
        }
        .with_validated_dates();

        assert_eq!(query.check_in_date, None);
        assert_eq!(query.check_out_date.as_deref(), Some("2999-01-03"));
    }

    #[test]
    fn search_request_fills_defaults() {
        let query = HotelSearchQuery {
            check_in_date: Some("2999-06-01".to_string()),
            adult_count: Some(2),
            child_ages: Some(vec![5, 8]),
            ..HotelSearchQuery::default()
        };

        let request = query.to_search_request("Ankara-Otelleri");
        assert_eq!(request.url, "Ankara-Otelleri");
        assert_eq!(request.check_in_date, "2999-06-01");
        assert_eq!(request.check_out_date, "");
        assert_eq!(request.adult_count, 2);
        assert_eq!(request.child_count, 0);
        assert_eq!(request.child_ages, vec![5, 8]);
        assert_eq!(request.currency, "TRY");
        assert_eq!(request.limit, 20);
        assert_eq!(request.offset, 0);
    }

    #[test]
    fn search_request_keeps_given_child_count() {
        let query = HotelSearchQuery {
            child_count: Some(1),
            ..HotelSearchQuery::default()
        };

        let request = query.to_search_request("Genel-Otelleri");
        assert_eq!(request.adult_count, 0);
        assert_eq!(request.child_count, 1);
        assert!(request.child_ages.is_empty());
    }

    #[test]
    fn blank_location_is_absent() {
        let query = HotelSearchQuery {
            location: Some("   ".to_string()),
            url: Some(" Antalya-Otelleri ".to_string()),
            ..HotelSearchQuery::default()
        };
        assert_eq!(query.location_text(), None);
        assert_eq!(query.url_slug(), Some("Antalya-Otelleri"));
    }
}
