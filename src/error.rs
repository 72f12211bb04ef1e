use std::fmt;

use crate::api::ApiError;

#[derive(Debug)]
pub enum ToolkitError {
    ConfigError(String),
    DuplicateTool(String),
    RegistrationError {
        model: String,
        message: String,
    },
    RuntimeNotFound(String),
    Api(ApiError),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl fmt::Display for ToolkitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolkitError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ToolkitError::DuplicateTool(id) => {
                write!(f, "Tool '{}' is already registered", id)
            }
            ToolkitError::RegistrationError { model, message } => {
                write!(f, "Failed to create model {}: {}", model, message)
            }
            ToolkitError::RuntimeNotFound(cmd) => {
                write!(f, "'{}' not installed or not in PATH", cmd)
            }
            ToolkitError::Api(e) => write!(f, "{}", e),
            ToolkitError::IoError(e) => write!(f, "IO error: {}", e),
            ToolkitError::JsonError(e) => write!(f, "JSON error: {}", e),
            ToolkitError::YamlError(e) => write!(f, "YAML error: {}", e),
            ToolkitError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ToolkitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolkitError::Api(e) => Some(e),
            ToolkitError::IoError(e) => Some(e),
            ToolkitError::JsonError(e) => Some(e),
            ToolkitError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for ToolkitError {
    fn from(err: ApiError) -> Self {
        ToolkitError::Api(err)
    }
}

impl From<std::io::Error> for ToolkitError {
    fn from(err: std::io::Error) -> Self {
        ToolkitError::IoError(err)
    }
}

impl From<serde_json::Error> for ToolkitError {
    fn from(err: serde_json::Error) -> Self {
        ToolkitError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for ToolkitError {
    fn from(err: serde_yaml::Error) -> Self {
        ToolkitError::YamlError(err)
    }
}

impl From<anyhow::Error> for ToolkitError {
    fn from(err: anyhow::Error) -> Self {
        ToolkitError::Other(format!("{:#}", err))
    }
}

impl From<String> for ToolkitError {
    fn from(msg: String) -> Self {
        ToolkitError::Other(msg)
    }
}

impl From<&str> for ToolkitError {
    fn from(msg: &str) -> Self {
        ToolkitError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ToolkitError>;
