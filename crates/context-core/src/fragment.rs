use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One provider's structured contribution to a prompt.
///
/// Serializes as `{"type": ..., "data": ...}`, which is also the shape sent to the
/// completion API inside the context list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextFragment {
    #[serde(rename = "type")]
    pub context_type: String,
    pub data: Value,
}

impl ContextFragment {
    pub fn new(context_type: impl Into<String>, data: Value) -> Self {
        Self {
            context_type: context_type.into(),
            data,
        }
    }

    /// Fragment returned by providers that have nothing to say for this request,
    /// e.g. when no hotel is selected.
    pub fn empty(context_type: impl Into<String>) -> Self {
        Self::new(context_type, Value::Object(Map::new()))
    }

    pub fn is_empty(&self) -> bool {
        match &self.data {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn is_type(&self, context_type: &str) -> bool {
        self.context_type == context_type
    }
}

/// Finds the first fragment of the given type.
pub fn find_fragment<'a>(
    fragments: &'a [ContextFragment],
    context_type: &str,
) -> Option<&'a ContextFragment> {
    fragments.iter().find(|f| f.is_type(context_type))
}
