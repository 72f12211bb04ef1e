//! Client for a local Ollama runtime.
//!
//! Each call is a single HTTP request. Connection failures surface as
//! [`ApiError::Offline`] so callers can tell the user the service appears
//! to be down; nothing is retried.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::client::{build_http_client, classify, status_error, ClientOptions};
use crate::api::models::{
    GenerationRequest, OllamaGenerateBody, OllamaGenerateResponse, OllamaOptions,
    OllamaTagsResponse,
};
use crate::api::ApiError;
use crate::config::Config;

const SERVICE: &str = "Ollama";
const PROBE_TIMEOUT_SECS: u64 = 2;

pub struct OllamaClient {
    base_url: String,
    http: Client,
    probe: Client,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, options: ClientOptions) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = build_http_client(&options, None)?;

        let probe_timeout = Duration::from_secs(PROBE_TIMEOUT_SECS);
        let probe = build_http_client(
            &ClientOptions {
                connect_timeout: probe_timeout.min(options.connect_timeout),
                request_timeout: probe_timeout,
            },
            None,
        )?;

        Ok(Self {
            base_url,
            http,
            probe,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(config.ollama_url.clone(), ClientOptions::from_config(config))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Names of locally installed models
    pub async fn try_list_models(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .probe
            .get(&url)
            .send()
            .await
            .map_err(|e| classify(e, SERVICE, &self.base_url))?;

        if !response.status().is_success() {
            return Err(status_error(SERVICE, response).await);
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| classify(e, SERVICE, &self.base_url))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Like [`try_list_models`](Self::try_list_models) but empty when unreachable
    pub async fn list_models(&self) -> Vec<String> {
        match self.try_list_models().await {
            Ok(models) => models,
            Err(e) => {
                debug!(error = %e, "could not list Ollama models");
                Vec::new()
            }
        }
    }

    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.probe.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, endpoint = %self.base_url, "Ollama probe failed");
                false
            }
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, ApiError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        debug!(model = %request.model, endpoint = %url, "sending generate request");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(e, SERVICE, &self.base_url))?;

        if !response.status().is_success() {
            let err = status_error(SERVICE, response).await;
            warn!(error = %err, "Ollama returned an error status");
            return Err(err);
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| classify(e, SERVICE, &self.base_url))?;

        if let Some(message) = parsed.error {
            return Err(ApiError::InvalidResponse {
                service: SERVICE,
                message,
            });
        }

        Ok(parsed.response.trim().to_string())
    }
}
