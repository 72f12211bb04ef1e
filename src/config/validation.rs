use regex::Regex;
use std::env;
use std::sync::OnceLock;

fn env_var_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").ok())
        .as_ref()
}

/// Expand environment variables in a string using ${VAR_NAME} syntax
///
/// Unknown variables are left untouched.
pub fn expand_env_var_in_string(value: &str) -> String {
    expand_with(value, |name| env::var(name).ok())
}

pub fn expand_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = value.to_string();
    let Some(pattern) = env_var_pattern() else {
        return result;
    };

    for cap in pattern.captures_iter(value) {
        let var_name = &cap[1];
        let replacement = lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name));
        result = result.replace(&cap[0], &replacement);
    }

    result
}

pub fn validate_temperature(value: f32) -> Result<f32, String> {
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "Temperature must be between 0.0 and 2.0, got: {}",
            value
        ))
    }
}

pub fn validate_max_tokens(value: u32) -> Result<u32, String> {
    if value == 0 {
        return Err("max_tokens must be greater than 0".to_string());
    }
    Ok(value)
}

pub fn validate_timeout(name: &str, value: u64) -> Result<u64, String> {
    if value == 0 {
        return Err(format!("{} must be greater than 0 seconds", name));
    }
    Ok(value)
}

pub fn validate_url(name: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(format!("{} must not be empty", name));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(format!(
            "{} must start with http:// or https://, got: {}",
            name, value
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_and_keeps_unknown() {
        let lookup = |name: &str| (name == "HOME").then(|| "/home/dev".to_string());
        assert_eq!(
            expand_with("${HOME}/notes/${MISSING}", lookup),
            "/home/dev/notes/${MISSING}"
        );
    }

    #[test]
    fn url_is_trimmed() {
        assert_eq!(
            validate_url("OLLAMA_URL", "http://localhost:11434/").unwrap(),
            "http://localhost:11434"
        );
        assert!(validate_url("OLLAMA_URL", "localhost").is_err());
        assert!(validate_url("OLLAMA_URL", "  ").is_err());
    }

    #[test]
    fn temperature_bounds() {
        assert!(validate_temperature(0.0).is_ok());
        assert!(validate_temperature(2.0).is_ok());
        assert!(validate_temperature(2.5).is_err());
        assert!(validate_temperature(-0.1).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert_eq!(validate_timeout("request_timeout", 30), Ok(30));
        assert!(validate_timeout("request_timeout", 0)
            .unwrap_err()
            .contains("request_timeout"));
    }
}
