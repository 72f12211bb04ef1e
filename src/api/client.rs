use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;

use crate::api::ApiError;
use crate::config::Config;

pub const TOOLKIT_USER_AGENT: &str = "AI-Toolkit/1.0";

#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            connect_timeout: Duration::from_secs(config.connect_timeout),
            request_timeout: Duration::from_secs(config.request_timeout),
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(300),
        }
    }
}

/// Build a client with JSON headers and, optionally, a bearer token
pub fn build_http_client(
    options: &ClientOptions,
    bearer: Option<&str>,
) -> Result<reqwest::Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(TOOLKIT_USER_AGENT));

    if let Some(token) = bearer {
        let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
            ApiError::InvalidResponse {
                service: "http",
                message: format!("Invalid authorization header: {}", e),
            }
        })?;
        headers.insert(AUTHORIZATION, value);
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(options.connect_timeout)
        .timeout(options.request_timeout)
        .build()
        .map_err(ApiError::Network)
}

/// Turn a transport failure into the error callers report to users
pub fn classify(err: reqwest::Error, service: &'static str, endpoint: &str) -> ApiError {
    if err.is_connect() {
        ApiError::Offline {
            service,
            endpoint: endpoint.to_string(),
        }
    } else if err.is_timeout() {
        ApiError::Timeout { service }
    } else {
        ApiError::Network(err)
    }
}

/// Read a non-2xx response into an `ApiError::Status`
pub async fn status_error(service: &'static str, response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    ApiError::Status {
        service,
        status,
        message,
    }
}
