use colored::Colorize;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::GeneratedModelfile;
use crate::error::{Result, ToolkitError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub model_name: String,
    /// Failure detail; `None` when the model was created
    pub error: Option<String>,
}

impl RegistrationOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Confirm the runtime CLI is installed and return its version line
pub async fn check_runtime(command: &str) -> Result<String> {
    let output = Command::new(command)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => ToolkitError::RuntimeNotFound(command.to_string()),
            _ => ToolkitError::Other(format!("Failed to run '{} --version': {}", command, e)),
        })?;

    if !output.status.success() {
        return Err(ToolkitError::RuntimeNotFound(command.to_string()));
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    debug!(runtime = %command, version = %version, "runtime available");
    Ok(version)
}

async fn create_model(command: &str, modelfile: &GeneratedModelfile) -> Option<String> {
    let result = Command::new(command)
        .arg("create")
        .arg(&modelfile.model_name)
        .arg("-f")
        .arg(&modelfile.path)
        .stdin(Stdio::null())
        .output()
        .await;

    match result {
        Ok(output) if output.status.success() => None,
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Some(if stderr.is_empty() {
                format!("exited with code {}", output.status.code().unwrap_or(-1))
            } else {
                stderr
            })
        }
        Err(e) => Some(e.to_string()),
    }
}

/// Run `<command> create <model> -f <path>` for each file, one at a time.
///
/// A missing runtime fails the whole call. Individual `create` failures are
/// reported per model so the caller can show every result before exiting.
pub async fn register_all(
    generated: &[GeneratedModelfile],
    command: &str,
) -> Result<Vec<RegistrationOutcome>> {
    check_runtime(command).await?;

    println!("\nCreating custom models in Ollama...");
    println!("{}", "=".repeat(60));

    let mut outcomes = Vec::with_capacity(generated.len());
    for modelfile in generated {
        println!("\nCreating model: {}", modelfile.model_name.bold());
        let error = create_model(command, modelfile).await;

        match &error {
            None => {
                info!(model = %modelfile.model_name, "model created");
                println!("{} Successfully created: {}", "✓".green(), modelfile.model_name);
            }
            Some(message) => {
                warn!(model = %modelfile.model_name, "model creation failed: {}", message);
                println!("{} Failed to create {}", "✗".red(), modelfile.model_name);
                println!("  Error: {}", message.red());
            }
        }

        outcomes.push(RegistrationOutcome {
            model_name: modelfile.model_name.clone(),
            error,
        });
    }

    Ok(outcomes)
}

/// The manual commands, for users who generated files without `--create`
pub fn print_next_steps(generated: &[GeneratedModelfile], command: &str) {
    let rule = "=".repeat(60);
    println!("{}", rule);
    println!("{}", "Next Steps:".bold());
    println!("{}", rule);
    println!();
    println!("To create the custom models in Ollama, run:");
    println!();
    for modelfile in generated {
        println!(
            "  {} create {} -f {}",
            command,
            modelfile.model_name,
            modelfile.path.display()
        );
    }
    println!();
    println!("OR run the automated setup:");
    println!();
    println!("  {}", "aitk setup --create".cyan());
    println!();
    println!("{}", rule);
}
