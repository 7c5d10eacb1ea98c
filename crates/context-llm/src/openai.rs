use async_trait::async_trait;
use context_core::{Config, ConfigError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{LLMError, Result};
use crate::gateway::LLMGateway;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// [`LLMGateway`] backed by an OpenAI-compatible `/chat/completions` endpoint.
///
/// No retry, backoff or timeout override is layered on top of the HTTP client.
pub struct OpenAIGateway {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OpenAIGateway {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
        }
    }

    /// Builds a gateway from configuration; fails when no API key is configured.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let mut gateway = Self::new(config.require_api_key()?);

        if let Some(base_url) = config.openai_base_url.as_deref() {
            if !base_url.is_empty() {
                gateway = gateway.with_base_url(base_url);
            }
        }

        if let Some(model) = config.model.as_deref() {
            if !model.is_empty() {
                gateway = gateway.with_model(model);
            }
        }

        if let Some(temperature) = config.temperature {
            gateway = gateway.with_temperature(temperature);
        }

        Ok(gateway)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl LLMGateway for OpenAIGateway {
    async fn send(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = self.build_request(system_prompt, user_prompt);
        let body = serde_json::to_vec(&request).map_err(|e| LLMError::Encoding(e.to_string()))?;

        log::debug!(
            "Sending completion request: model={}, system_len={}, user_len={}",
            self.model,
            system_prompt.len(),
            user_prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            log::warn!("Completion API returned HTTP {}", status);
            return Err(LLMError::Api { status, body });
        }

        let text = response.text().await?;
        log::debug!("Completion response received: {} bytes", text.len());

        let decoded: ChatCompletionResponse = serde_json::from_str(&text)?;
        extract_first_content(decoded)
    }
}

fn extract_first_content(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(LLMError::EmptyResponse)
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[allow(dead_code)]
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_gateway() {
        let gateway = OpenAIGateway::new("test_key");
        assert_eq!(gateway.api_key, "test_key");
        assert_eq!(gateway.base_url, "https://api.openai.com/v1");
        assert_eq!(gateway.model, "gpt-4o");
        assert_eq!(gateway.temperature, None);
    }

    #[test]
    fn test_chained_builders() {
        let gateway = OpenAIGateway::new("test_key")
            .with_base_url("https://proxy.example.com/v1/")
            .with_model("gpt-4o-mini")
            .with_temperature(0.2);

        assert_eq!(gateway.base_url, "https://proxy.example.com/v1");
        assert_eq!(gateway.model(), "gpt-4o-mini");
        assert_eq!(gateway.temperature, Some(0.2));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = Config::default();
        let err = OpenAIGateway::from_config(&config).err().unwrap();
        assert_eq!(err, ConfigError::MissingKey("OPENAI_API_KEY".to_string()));
    }

    #[test]
    fn test_from_config_applies_overrides() {
        let config = Config {
            openai_api_key: Some("sk-config".to_string()),
            openai_base_url: Some("http://localhost:9999".to_string()),
            model: Some(String::new()),
            temperature: Some(0.5),
            ..Config::default()
        };

        let gateway = OpenAIGateway::from_config(&config).unwrap();
        assert_eq!(gateway.api_key, "sk-config");
        assert_eq!(gateway.base_url, "http://localhost:9999");
        assert_eq!(gateway.model, "gpt-4o");
        assert_eq!(gateway.temperature, Some(0.5));
    }

    #[test]
    fn test_request_body_shape() {
        let gateway = OpenAIGateway::new("k").with_model("gpt-4o-mini");
        let request = gateway.build_request("be brief", "hi");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_extract_first_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"first"}},{"message":{"role":"assistant","content":"second"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_first_content(response).unwrap(), "first");
    }

    #[test]
    fn test_extract_from_empty_choices() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_first_content(response),
            Err(LLMError::EmptyResponse)
        ));

        let response: ChatCompletionResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(matches!(
            extract_first_content(response),
            Err(LLMError::EmptyResponse)
        ));
    }
}
