use crate::api::gemini::DEFAULT_GEMINI_MODEL;
use crate::api::openai::DEFAULT_OPENAI_MODEL;
use crate::api::{error_message, ApiError, GeminiClient, GenerationRequest, OllamaClient, OpenAiClient};
use crate::cli::Provider;
use crate::config::Config;

/// One of the three text-generation services, chosen at startup
pub enum ChatBackend {
    Ollama(OllamaClient),
    OpenAi(OpenAiClient),
    Gemini(GeminiClient),
}

impl ChatBackend {
    pub fn from_config(provider: Provider, config: &Config) -> Result<Self, ApiError> {
        Ok(match provider {
            Provider::Ollama => ChatBackend::Ollama(OllamaClient::from_config(config)?),
            Provider::Openai => ChatBackend::OpenAi(OpenAiClient::from_config(config)?),
            Provider::Gemini => ChatBackend::Gemini(GeminiClient::from_config(config)?),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChatBackend::Ollama(_) => "Ollama",
            ChatBackend::OpenAi(_) => "OpenAI",
            ChatBackend::Gemini(_) => "Gemini",
        }
    }

    /// Model used when none is given on the command line
    pub fn default_model(&self, config: &Config) -> String {
        match self {
            ChatBackend::Ollama(_) => config.model.clone(),
            ChatBackend::OpenAi(_) => DEFAULT_OPENAI_MODEL.to_string(),
            ChatBackend::Gemini(_) => DEFAULT_GEMINI_MODEL.to_string(),
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, ApiError> {
        match self {
            ChatBackend::Ollama(client) => client.generate(request).await,
            ChatBackend::OpenAi(client) => client.generate(request).await,
            ChatBackend::Gemini(client) => client.generate(request).await,
        }
    }

    /// Never fails: errors come back as an `Error: ...` string
    pub async fn generate_or_message(&self, request: &GenerationRequest) -> String {
        match self.generate(request).await {
            Ok(text) => text,
            Err(e) => error_message(&e),
        }
    }
}
