use ai_toolkit::config::{CliOverrides, Config, FileConfig};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn resolve(
    file: FileConfig,
    vars: &HashMap<String, String>,
    cli: &CliOverrides,
) -> Result<Config, String> {
    Config::resolve(file, &|key| vars.get(key).cloned(), cli)
}

#[test]
fn test_defaults() {
    let config = resolve(FileConfig::default(), &env(&[]), &CliOverrides::default()).unwrap();
    assert_eq!(config.ollama_url, "http://localhost:11434");
    assert_eq!(config.model, "llama3.2:3b");
    assert_eq!(config.max_tokens, 2048);
    assert_eq!(config.temperature, 0.7);
    assert_eq!(config.top_p, 0.9);
    assert_eq!(config.modelfiles_dir, PathBuf::from("modelfiles"));
    assert_eq!(config.runtime_command, "ollama");
    assert_eq!(config.code_executor.interpreter, "python3");
    assert_eq!(config.code_executor.timeout_secs, 10);
    assert_eq!(config.site.port, 8000);
    assert!(config.openai_api_key.is_none());
    assert!(!config.verbose);
}

#[test]
fn test_env_overrides_defaults() {
    let vars = env(&[
        ("OLLAMA_URL", "http://gpu-box:11434/"),
        ("AI_MODEL", "mistral:7b"),
        ("AI_MAX_TOKENS", "512"),
        ("AI_TEMPERATURE", "1.2"),
        ("OPENAI_API_KEY", "sk-env"),
        ("AITK_DATA_DIR", "/tmp/aitk-data"),
    ]);
    let config = resolve(FileConfig::default(), &vars, &CliOverrides::default()).unwrap();
    assert_eq!(config.ollama_url, "http://gpu-box:11434");
    assert_eq!(config.model, "mistral:7b");
    assert_eq!(config.max_tokens, 512);
    assert_eq!(config.temperature, 1.2);
    assert_eq!(config.openai_api_key.as_deref(), Some("sk-env"));
    assert_eq!(
        config.notes_file(),
        PathBuf::from("/tmp/aitk-data/notes/notes.jsonl")
    );
}

#[test]
fn test_precedence_cli_then_env_then_file() {
    let file: FileConfig = serde_yaml::from_str(
        "api:\n  ollama_url: http://from-file:11434\nmodel:\n  default_model: phi3\n  max_tokens: 100\n",
    )
    .unwrap();

    let vars = env(&[("OLLAMA_URL", "http://from-env:11434")]);
    let cli = CliOverrides {
        ollama_url: Some("http://from-cli:11434".to_string()),
        verbose: true,
    };

    let config = resolve(file.clone(), &vars, &cli).unwrap();
    assert_eq!(config.ollama_url, "http://from-cli:11434");
    assert!(config.verbose);

    let config = resolve(file.clone(), &vars, &CliOverrides::default()).unwrap();
    assert_eq!(config.ollama_url, "http://from-env:11434");

    let config = resolve(file, &env(&[]), &CliOverrides::default()).unwrap();
    assert_eq!(config.ollama_url, "http://from-file:11434");
    assert_eq!(config.model, "phi3");
    assert_eq!(config.max_tokens, 100);
}

#[test]
fn test_invalid_values_are_rejected() {
    let cli = CliOverrides::default();
    assert!(resolve(FileConfig::default(), &env(&[("AI_TEMPERATURE", "3.5")]), &cli)
        .unwrap_err()
        .contains("Temperature"));
    assert!(resolve(FileConfig::default(), &env(&[("AI_TEMPERATURE", "warm")]), &cli).is_err());
    assert!(resolve(FileConfig::default(), &env(&[("AI_MAX_TOKENS", "0")]), &cli).is_err());
    assert!(resolve(FileConfig::default(), &env(&[("AI_MAX_TOKENS", "-5")]), &cli).is_err());
    assert!(resolve(FileConfig::default(), &env(&[("OLLAMA_URL", "localhost:11434")]), &cli)
        .unwrap_err()
        .contains("http://"));

    for yaml in [
        "api:\n  connect_timeout: 0\n",
        "api:\n  request_timeout: 0\n",
        "tools:\n  code_executor:\n    timeout_secs: 0\n",
    ] {
        let file: FileConfig = serde_yaml::from_str(yaml).unwrap();
        let err = resolve(file, &env(&[]), &cli).unwrap_err();
        assert!(err.contains("greater than 0"), "{}: {}", yaml, err);
    }
}

#[test]
fn test_blank_keys_are_ignored() {
    let vars = env(&[("OPENAI_API_KEY", "  "), ("AI_MODEL", "")]);
    let config = resolve(FileConfig::default(), &vars, &CliOverrides::default()).unwrap();
    assert!(config.openai_api_key.is_none());
    assert_eq!(config.model, "llama3.2:3b");
}

#[test]
fn test_load_yaml_and_json_files() {
    let dir = TempDir::new().unwrap();

    let yaml = dir.path().join("aitk.yaml");
    fs::write(
        &yaml,
        "tools:\n  modelfiles_dir: out/models\n  runtime_command: /opt/ollama/bin/ollama\n  code_executor:\n    interpreter: python3.12\n    timeout_secs: 3\nsite:\n  port: 9090\nlogging:\n  verbose: true\n",
    )
    .unwrap();
    let file = FileConfig::load_from(&yaml).unwrap();
    let config = resolve(file, &env(&[]), &CliOverrides::default()).unwrap();
    assert_eq!(config.modelfiles_dir, PathBuf::from("out/models"));
    assert_eq!(config.runtime_command, "/opt/ollama/bin/ollama");
    assert_eq!(config.code_executor.interpreter, "python3.12");
    assert_eq!(config.code_executor.timeout_secs, 3);
    assert_eq!(config.site.port, 9090);
    assert_eq!(config.site.host, "127.0.0.1");
    assert!(config.verbose);

    let json = dir.path().join("aitk.json");
    fs::write(&json, r#"{"model": {"temperature": 0.1}}"#).unwrap();
    let file = FileConfig::load_from(&json).unwrap();
    let config = resolve(file, &env(&[]), &CliOverrides::default()).unwrap();
    assert_eq!(config.temperature, 0.1);
}

#[test]
fn test_bad_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    let err = FileConfig::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.json"));
}
