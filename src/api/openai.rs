use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::api::client::{build_http_client, classify, status_error, ClientOptions};
use crate::api::models::{ChatCompletionBody, ChatMessage, GenerationRequest};
use crate::api::response::extract_chat_content;
use crate::api::ApiError;
use crate::config::Config;

const SERVICE: &str = "OpenAI";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

pub struct OpenAiClient {
    base_url: String,
    http: Client,
}

impl OpenAiClient {
    pub fn new(
        api_key: Option<&str>,
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ApiError> {
        let api_key = api_key.ok_or(ApiError::MissingKey {
            service: SERVICE,
            env_var: "OPENAI_API_KEY",
        })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: build_http_client(&options, Some(api_key))?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            config.openai_api_key.as_deref(),
            config.openai_url.clone(),
            ClientOptions::from_config(config),
        )
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, ApiError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatCompletionBody {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(model = %request.model, "sending chat completion request");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(e, SERVICE, &self.base_url))?;

        if !response.status().is_success() {
            return Err(status_error(SERVICE, response).await);
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| classify(e, SERVICE, &self.base_url))?;
        extract_chat_content(&json)
    }
}
