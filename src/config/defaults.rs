pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_RUNTIME_COMMAND: &str = "ollama";

pub fn default_max_tokens() -> u32 {
    2048
}

pub fn default_temperature() -> f32 {
    0.7
}

pub fn default_top_p() -> f32 {
    0.9
}

pub fn default_connect_timeout() -> u64 {
    5
}

pub fn default_request_timeout() -> u64 {
    300 // long generations on CPU
}

pub fn default_interpreter() -> String {
    "python3".to_string()
}

pub fn default_code_timeout() -> u64 {
    10
}

pub fn default_modelfiles_dir() -> String {
    "modelfiles".to_string()
}

pub fn default_content_file() -> String {
    "site/content.json".to_string()
}

pub fn default_assets_dir() -> String {
    "site/assets".to_string()
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    8000
}
