use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::api::client::{build_http_client, classify, status_error, ClientOptions};
use crate::api::models::{
    GeminiBody, GeminiContent, GeminiGenerationConfig, GeminiPart, GenerationRequest,
};
use crate::api::response::extract_gemini_text;
use crate::api::ApiError;
use crate::config::Config;

const SERVICE: &str = "Gemini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<&str>,
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ApiError> {
        let api_key = api_key.ok_or(ApiError::MissingKey {
            service: SERVICE,
            env_var: "GEMINI_API_KEY",
        })?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: build_http_client(&options, None)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            config.gemini_api_key.as_deref(),
            config.gemini_url.clone(),
            ClientOptions::from_config(config),
        )
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, ApiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );
        let body = GeminiBody {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        debug!(model = %request.model, "sending generateContent request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
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
        extract_gemini_text(&json)
    }
}
