use std::sync::Arc;

use async_trait::async_trait;
use context_core::{ContextFragment, ExtractionError};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Which entity (hotel) the request concerns, for providers that need one.
///
/// Travels with the request instead of living on the provider, so one provider
/// instance can serve requests for different hotels at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub hotel_url: Option<String>,
    pub hotel_code: Option<String>,
}

impl Selection {
    pub fn hotel_url(url: impl Into<String>) -> Self {
        Self {
            hotel_url: Some(url.into()),
            hotel_code: None,
        }
    }

    pub fn hotel_code(code: impl Into<String>) -> Self {
        Self {
            hotel_url: None,
            hotel_code: Some(code.into()),
        }
    }

    pub fn with_hotel_url(mut self, url: impl Into<String>) -> Self {
        self.hotel_url = Some(url.into());
        self
    }

    pub fn with_hotel_code(mut self, code: impl Into<String>) -> Self {
        self.hotel_code = Some(code.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.hotel_url.is_none() && self.hotel_code.is_none()
    }
}

/// One prompt plus the selection it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextRequest {
    pub prompt: String,
    pub selection: Selection,
}

impl ContextRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            selection: Selection::default(),
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }
}

#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Tag carried by every fragment this provider produces.
    fn context_type(&self) -> &str;

    async fn provide_context(&self, request: &ContextRequest) -> Result<ContextFragment>;
}

pub type SharedContextProvider = Arc<dyn ContextProvider>;

pub(crate) fn to_fragment_data<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| ExtractionError::UnexpectedShape(e.to_string()).into())
}
