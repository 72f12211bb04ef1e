use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::calculator::CalculatorTool;
use super::code_executor::CodeExecutorTool;
use super::notes::{NoteStore, NoteTakingTool};
use super::portfolio::PortfolioTool;
use super::web_search::WebSearchTool;
use super::{tool_id, Tool, ToolDescriptor};
use crate::config::{CodeExecutorConfig, Config};
use crate::error::{Result, ToolkitError};
use crate::portfolio::PortfolioContent;

pub const MANIFEST_VERSION: &str = "1.0";

/// Everything the built-in tools need from the environment
#[derive(Clone)]
pub struct ToolContext {
    pub notes: NoteStore,
    pub portfolio: Arc<PortfolioContent>,
    pub code_executor: CodeExecutorConfig,
    pub search_endpoint: String,
}

impl ToolContext {
    pub fn from_config(config: &Config) -> Self {
        let portfolio = PortfolioContent::load_or_default(Path::new(&config.site.content_file));
        Self {
            notes: NoteStore::new(config.notes_file()),
            portfolio: Arc::new(portfolio),
            code_executor: config.code_executor.clone(),
            search_endpoint: super::web_search::DUCKDUCKGO_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct ToolManifest {
    pub version: String,
    pub tools: Vec<ManifestEntry>,
}

/// Tools in registration order, looked up by id
pub struct ToolRegistry {
    tools: Vec<(String, Box<dyn Tool>)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn with_default_tools(ctx: &ToolContext) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Box::new(CalculatorTool::new()))?;
        registry.register(Box::new(WebSearchTool::new(
            ctx.search_endpoint.clone(),
            Arc::clone(&ctx.portfolio),
        )?))?;
        registry.register(Box::new(CodeExecutorTool::new(ctx.code_executor.clone())))?;
        registry.register(Box::new(NoteTakingTool::new(ctx.notes.clone())))?;
        registry.register(Box::new(PortfolioTool::new(Arc::clone(&ctx.portfolio))))?;
        Ok(registry)
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<()> {
        let id = tool.descriptor().id();
        if self.tools.iter().any(|(existing, _)| *existing == id) {
            return Err(ToolkitError::DuplicateTool(id));
        }
        debug!(tool = %tool.descriptor().name, id = %id, "registered tool");
        self.tools.push((id, tool));
        Ok(())
    }

    /// Case-insensitive; spaces become dashes
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        let id = tool_id(name);
        self.tools
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, tool)| tool.as_ref())
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(|(_, tool)| tool.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn execute(&self, name: &str, input: &str) -> String {
        let Some(tool) = self.get(name) else {
            return format!(
                "Tool '{}' not found. Available tools: {}",
                name,
                self.list().join(", ")
            );
        };

        if !tool.validate_input(input) {
            return format!("Invalid input for {}", tool.descriptor().name);
        }

        info!(tool = %tool.descriptor().name, "executing tool");
        tool.execute(input).await
    }

    pub fn manifest(&self) -> ToolManifest {
        ToolManifest {
            version: MANIFEST_VERSION.to_string(),
            tools: self
                .descriptors()
                .into_iter()
                .map(|d| ManifestEntry {
                    name: d.name.clone(),
                    description: d.description.clone(),
                    version: d.version.clone(),
                    kind: d.kind.to_string(),
                })
                .collect(),
        }
    }

    pub fn export_manifest(&self, path: &Path) -> Result<ToolManifest> {
        let manifest = self.manifest();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(&manifest)?;
        json.push('\n');
        fs::write(path, json)?;
        info!(path = %path.display(), "exported tools manifest");
        Ok(manifest)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
