mod api;
pub mod defaults;
mod tools;
mod validation;

use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::{ApiConfig, ModelConfig};
pub use tools::{CodeExecutorConfig, SiteConfig, ToolsConfig};
pub use validation::{expand_env_var_in_string, expand_with};

use defaults::{
    default_connect_timeout, default_max_tokens, default_modelfiles_dir, default_request_timeout,
    default_temperature, default_top_p, DEFAULT_GEMINI_URL, DEFAULT_MODEL, DEFAULT_OLLAMA_URL,
    DEFAULT_OPENAI_URL, DEFAULT_RUNTIME_COMMAND,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub filter: Option<String>,
}

/// Resolved settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_url: String,
    pub openai_url: String,
    pub gemini_url: String,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub connect_timeout: u64,
    pub request_timeout: u64,
    pub verbose: bool,
    pub log_filter: Option<String>,
    pub data_dir: PathBuf,
    pub modelfiles_dir: PathBuf,
    pub runtime_command: String,
    pub code_executor: CodeExecutorConfig,
    pub site: SiteConfig,
}

/// Values taken from the command line, highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub ollama_url: Option<String>,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self, String> {
        let file_config = match args.config.as_deref() {
            Some(path) => FileConfig::load_from(path).map_err(|e| format!("{:#}", e))?,
            None => FileConfig::load().map_err(|e| format!("{:#}", e))?,
        };

        let overrides = CliOverrides {
            ollama_url: args.ollama_url.clone(),
            verbose: args.verbose,
        };

        Self::resolve(file_config, &|key| env::var(key).ok(), &overrides)
    }

    /// Merge sources: CLI > env vars > config file > defaults
    pub fn resolve(
        file: FileConfig,
        lookup: &dyn Fn(&str) -> Option<String>,
        cli: &CliOverrides,
    ) -> Result<Self, String> {
        let ollama_url = cli
            .ollama_url
            .clone()
            .or_else(|| lookup("OLLAMA_URL"))
            .or(file.api.ollama_url)
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        let ollama_url = validation::validate_url("OLLAMA_URL", &ollama_url)?;

        let openai_url = lookup("OPENAI_BASE_URL")
            .or(file.api.openai_url)
            .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
        let openai_url = validation::validate_url("OPENAI_BASE_URL", &openai_url)?;

        let gemini_url = lookup("GEMINI_BASE_URL")
            .or(file.api.gemini_url)
            .unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string());
        let gemini_url = validation::validate_url("GEMINI_BASE_URL", &gemini_url)?;

        // API keys only come from the environment
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        let gemini_api_key = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());

        let model = lookup("AI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .or(file.model.default_model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let max_tokens = match lookup("AI_MAX_TOKENS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("AI_MAX_TOKENS must be a positive integer, got: {}", raw))?,
            None => file.model.max_tokens.unwrap_or_else(default_max_tokens),
        };
        let max_tokens = validation::validate_max_tokens(max_tokens)?;

        let temperature = match lookup("AI_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .map_err(|_| format!("AI_TEMPERATURE must be a number, got: {}", raw))?,
            None => file.model.temperature.unwrap_or_else(default_temperature),
        };
        let temperature = validation::validate_temperature(temperature)?;

        let top_p = file.model.top_p.unwrap_or_else(default_top_p);
        if !(0.0..=1.0).contains(&top_p) {
            return Err(format!("top_p must be between 0.0 and 1.0, got: {}", top_p));
        }

        let connect_timeout = validation::validate_timeout(
            "connect_timeout",
            file.api.connect_timeout.unwrap_or_else(default_connect_timeout),
        )?;
        let request_timeout = validation::validate_timeout(
            "request_timeout",
            file.api.request_timeout.unwrap_or_else(default_request_timeout),
        )?;
        let code_executor = file.tools.code_executor;
        validation::validate_timeout("code_executor.timeout_secs", code_executor.timeout_secs)?;

        let verbose = cli.verbose
            || lookup("AITK_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file.logging.verbose)
                .unwrap_or(false);

        let log_filter = lookup("AITK_LOG").or(file.logging.filter);

        let data_dir = lookup("AITK_DATA_DIR")
            .or_else(|| file.tools.data_dir.as_deref().map(expand_env_var_in_string))
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".ai_toolkit")))
            .unwrap_or_else(|| PathBuf::from(".ai_toolkit"));

        let modelfiles_dir = file
            .tools
            .modelfiles_dir
            .as_deref()
            .map(expand_env_var_in_string)
            .unwrap_or_else(default_modelfiles_dir);

        let runtime_command = file
            .tools
            .runtime_command
            .unwrap_or_else(|| DEFAULT_RUNTIME_COMMAND.to_string());

        let mut site = file.site;
        site.content_file = expand_env_var_in_string(&site.content_file);
        site.assets_dir = expand_env_var_in_string(&site.assets_dir);

        Ok(Config {
            ollama_url,
            openai_url,
            gemini_url,
            openai_api_key,
            gemini_api_key,
            model,
            max_tokens,
            temperature,
            top_p,
            connect_timeout,
            request_timeout,
            verbose,
            log_filter,
            data_dir,
            modelfiles_dir: PathBuf::from(modelfiles_dir),
            runtime_command,
            code_executor,
            site,
        })
    }

    pub fn notes_file(&self) -> PathBuf {
        self.data_dir.join("notes").join("notes.jsonl")
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse YAML config file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse JSON config file: {}", path.display())
            })?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".aitk.yaml"),
            PathBuf::from(".aitk.yml"),
            PathBuf::from(".aitk.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("aitk");
            paths.push(config_dir.join("aitk.yaml"));
            paths.push(config_dir.join("aitk.yml"));
            paths.push(config_dir.join("aitk.json"));
        }

        paths
    }
}
