use futures::FutureExt;
use regex::Regex;
use std::io::Write;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::{Tool, ToolDescriptor, ToolFuture};
use crate::config::CodeExecutorConfig;

const SYSTEM_PROMPT: &str = "You are a helpful code assistant. When users ask questions related to programming:

1. Provide clear, well-commented code
2. Explain what the code does
3. If asked to execute code, provide it in a code block
4. For complex problems, break the solution into steps
5. When showing code, format it properly:
   ```python
   # Your code here
   ```

You can execute Python code to:
- Demonstrate solutions
- Run calculations and simulations
- Process data
- Test algorithms
- Visualize concepts (text-based)

When providing executable code:
- Make it self-contained and runnable
- Include any necessary imports
- Add print statements to show results
- Handle errors gracefully

Safety considerations:
- Code runs in isolation with a 10-second timeout
- Focus on constructive, educational code
- Be explicit about what the code does";

fn fence_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [r"(?s)```(?:python|py)\r?\n(.*?)\r?\n```", r"(?s)```\r?\n(.*?)\r?\n```"]
            .into_iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

/// Body of the first python (or untagged) fenced block, or the text itself
pub fn extract_code_block(text: &str) -> &str {
    for re in fence_patterns() {
        if let Some(body) = re.captures(text).and_then(|c| c.get(1)) {
            return body.as_str();
        }
    }
    text
}

pub struct CodeExecutorTool {
    descriptor: ToolDescriptor,
    settings: CodeExecutorConfig,
}

impl CodeExecutorTool {
    pub fn new(settings: CodeExecutorConfig) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "Code Executor".to_string(),
                description:
                    "Execute Python code snippets, run scripts, and analyze code functionality."
                        .to_string(),
                version: "1.0".to_string(),
                kind: "CodeExecutorTool",
                system_prompt: SYSTEM_PROMPT.to_string(),
            },
            settings,
        }
    }

    pub async fn run(&self, input: &str) -> String {
        let code = extract_code_block(input.trim());
        if code.trim().is_empty() {
            return "Please provide Python code to execute.".to_string();
        }

        match self.run_script(code).await {
            Ok(output) if output.is_empty() => {
                "Code executed successfully but produced no output.".to_string()
            }
            Ok(output) => output,
            Err(message) => message,
        }
    }

    async fn run_script(&self, code: &str) -> Result<String, String> {
        let start_time = Instant::now();

        // Removed when dropped, which happens after the child has exited
        let mut script = tempfile::Builder::new()
            .prefix("aitk-")
            .suffix(".py")
            .tempfile()
            .map_err(|e| format!("Error executing code: {}", e))?;
        script
            .write_all(code.as_bytes())
            .and_then(|_| script.flush())
            .map_err(|e| format!("Error executing code: {}", e))?;

        debug!(
            interpreter = %self.settings.interpreter,
            script = %script.path().display(),
            timeout_secs = self.settings.timeout_secs,
            "running code"
        );

        let child = Command::new(&self.settings.interpreter)
            .arg(script.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Error executing code: {}", e))?;

        let limit = Duration::from_secs(self.settings.timeout_secs);
        let output = timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| {
                format!(
                    "Error: Code execution timed out (exceeded {} seconds)",
                    self.settings.timeout_secs
                )
            })?
            .map_err(|e| format!("Error executing code: {}", e))?;

        debug!(
            exit_code = output.status.code().unwrap_or(-1),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "code finished"
        );

        let mut result = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            result.push_str("\nErrors:\n");
            result.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        Ok(result)
    }
}

impl Tool for CodeExecutorTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn execute<'a>(&'a self, input: &'a str) -> ToolFuture<'a> {
        self.run(input).boxed()
    }
}
