use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    default_assets_dir, default_code_timeout, default_content_file, default_host,
    default_interpreter, default_port,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Where notes and other tool data live. Defaults to ~/.ai_toolkit
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub modelfiles_dir: Option<String>,
    #[serde(default)]
    pub runtime_command: Option<String>,
    #[serde(default)]
    pub code_executor: CodeExecutorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodeExecutorConfig {
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    #[serde(default = "default_code_timeout")]
    pub timeout_secs: u64,
}

impl Default for CodeExecutorConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            timeout_secs: default_code_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default = "default_content_file")]
    pub content_file: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_file: default_content_file(),
            assets_dir: default_assets_dir(),
            host: default_host(),
            port: default_port(),
        }
    }
}
