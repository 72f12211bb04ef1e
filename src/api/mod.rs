pub mod backend;
pub mod client;
pub mod gemini;
pub mod models;
pub mod ollama;
pub mod openai;
pub mod response;

use std::fmt;

pub use backend::ChatBackend;
pub use client::ClientOptions;
pub use gemini::GeminiClient;
pub use models::GenerationRequest;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

#[derive(Debug)]
pub enum ApiError {
    /// The service could not be reached at all
    Offline {
        service: &'static str,
        endpoint: String,
    },
    Timeout {
        service: &'static str,
    },
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },
    MissingKey {
        service: &'static str,
        env_var: &'static str,
    },
    InvalidResponse {
        service: &'static str,
        message: String,
    },
    Network(reqwest::Error),
}

impl ApiError {
    pub fn is_offline(&self) -> bool {
        matches!(self, ApiError::Offline { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Offline { service, endpoint } => {
                write!(f, "Cannot connect to {}. Is it running at {}?", service, endpoint)
            }
            ApiError::Timeout { service } => write!(
                f,
                "Request to {} timed out. The model may be slow or overloaded.",
                service
            ),
            ApiError::Status {
                service,
                status,
                message,
            } => write!(f, "{} API error (status {}): {}", service, status, message),
            ApiError::MissingKey { service, env_var } => {
                write!(f, "{} API key not found. Set {}", service, env_var)
            }
            ApiError::InvalidResponse { service, message } => {
                write!(f, "Unexpected {} response: {}", service, message)
            }
            ApiError::Network(e) => write!(f, "Network error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e) => Some(e),
            _ => None,
        }
    }
}

/// Render an API failure the way tool output reports errors
pub fn error_message(err: &ApiError) -> String {
    format!("Error: {}", err)
}
