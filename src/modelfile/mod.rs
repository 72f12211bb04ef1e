//! Ollama Modelfile generation for the registered tools.

pub mod register;

pub use register::{check_runtime, print_next_steps, register_all, RegistrationOutcome};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::defaults::{default_temperature, default_top_p, DEFAULT_MODEL};
use crate::config::Config;
use crate::error::{Result, ToolkitError};
use crate::tools::{ToolDescriptor, ToolRegistry};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelfileOptions {
    pub base_model: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for ModelfileOptions {
    fn default() -> Self {
        Self {
            base_model: DEFAULT_MODEL.to_string(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

impl ModelfileOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModelfile {
    pub tool_id: String,
    pub model_name: String,
    pub path: PathBuf,
}

pub fn model_name(tool_id: &str) -> String {
    format!("{}-helper", tool_id)
}

pub fn file_name(tool_id: &str) -> String {
    format!("Modelfile-{}", tool_id)
}

/// Make a prompt safe inside a double-quoted SYSTEM value.
/// Backslashes go first so the escapes added afterwards survive.
pub fn escape_system_prompt(prompt: &str) -> String {
    prompt
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

pub fn render(descriptor: &ToolDescriptor, options: &ModelfileOptions) -> String {
    format!(
        "FROM {}\nPARAMETER temperature {}\nPARAMETER top_p {}\nSYSTEM \"{}\"\n",
        options.base_model,
        options.temperature,
        options.top_p,
        escape_system_prompt(&descriptor.system_prompt)
    )
}

/// Write one Modelfile per registered tool into `dir`, in registry order.
/// Files whose content is already current are left untouched.
pub fn generate_all(
    registry: &ToolRegistry,
    dir: &Path,
    options: &ModelfileOptions,
) -> Result<Vec<GeneratedModelfile>> {
    fs::create_dir_all(dir).map_err(|e| {
        ToolkitError::Other(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let mut generated = Vec::with_capacity(registry.len());
    for descriptor in registry.descriptors() {
        let tool_id = descriptor.id();
        let path = dir.join(file_name(&tool_id));
        let content = render(descriptor, options);

        let current = fs::read_to_string(&path).ok();
        if current.as_deref() == Some(content.as_str()) {
            debug!(path = %path.display(), "modelfile unchanged");
        } else {
            fs::write(&path, &content).map_err(|e| {
                ToolkitError::Other(format!("Failed to write {}: {}", path.display(), e))
            })?;
            info!(path = %path.display(), "wrote modelfile");
        }

        generated.push(GeneratedModelfile {
            model_name: model_name(&tool_id),
            tool_id,
            path,
        });
    }

    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(prompt: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: "Calculator".to_string(),
            description: "Adds things".to_string(),
            version: "1.0".to_string(),
            kind: "CalculatorTool",
            system_prompt: prompt.to_string(),
        }
    }

    #[test]
    fn test_render_layout() {
        let text = render(&descriptor("Be exact."), &ModelfileOptions::default());
        assert_eq!(
            text,
            "FROM llama3.2:3b\nPARAMETER temperature 0.7\nPARAMETER top_p 0.9\nSYSTEM \"Be exact.\"\n"
        );
    }

    #[test]
    fn test_escaping() {
        assert_eq!(
            escape_system_prompt("say \"hi\"\nuse C:\\path"),
            "say \\\"hi\\\"\\nuse C:\\\\path"
        );
        assert_eq!(escape_system_prompt("a\r\nb"), "a\\nb");
    }

    #[test]
    fn test_rendered_system_line_is_single_line() {
        let text = render(&descriptor("one\ntwo\n\"three\""), &ModelfileOptions::default());
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_names() {
        assert_eq!(model_name("code-executor"), "code-executor-helper");
        assert_eq!(file_name("web-search"), "Modelfile-web-search");
    }
}
