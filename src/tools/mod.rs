pub mod calculator;
pub mod code_executor;
pub mod notes;
pub mod portfolio;
mod registry;
pub mod web_search;

pub use registry::{ManifestEntry, ToolContext, ToolManifest, ToolRegistry};

use futures::future::BoxFuture;

pub type ToolFuture<'a> = BoxFuture<'a, String>;

/// Static metadata for one tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub version: String,
    pub kind: &'static str,
    pub system_prompt: String,
}

impl ToolDescriptor {
    /// Registry key, e.g. "Code Executor" -> "code-executor"
    pub fn id(&self) -> String {
        tool_id(&self.name)
    }
}

pub fn tool_id(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// A named unit that turns a textual instruction into a textual answer.
///
/// Implementations never fail: malformed input produces a user-facing
/// message instead of an error value.
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;

    fn execute<'a>(&'a self, input: &'a str) -> ToolFuture<'a>;

    fn validate_input(&self, input: &str) -> bool {
        !input.trim().is_empty()
    }
}

/// Cut `text` to at most `max` characters without splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_lowercase_and_dashed() {
        assert_eq!(tool_id("Code Executor"), "code-executor");
        assert_eq!(tool_id("  Calculator "), "calculator");
        assert_eq!(tool_id("note-taking"), "note-taking");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
