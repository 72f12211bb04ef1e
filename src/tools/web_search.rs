use futures::FutureExt;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{truncate_chars, Tool, ToolDescriptor, ToolFuture};
use crate::api::client::TOOLKIT_USER_AGENT;
use crate::error::{Result, ToolkitError};
use crate::portfolio::{or_na, PortfolioContent};

pub const DUCKDUCKGO_ENDPOINT: &str = "https://api.duckduckgo.com/";
pub const MAX_RESULTS: usize = 5;
const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

const BASE_PROMPT: &str = "You are a helpful information assistant with access to web search.

WEB SEARCH CAPABILITIES:
1. If you can answer from your knowledge, do so
2. If you need current information, use web search to find the latest data
3. Always cite sources when providing web search results
4. Be clear about what information came from web search vs. your training data

You can search the internet for:
- Current events and news
- AI/ML industry trends and developments
- Technical documentation
- Specific facts and statistics
- Product reviews and comparisons

When presenting search results, always:
- Provide the source/URL
- Explain how the information answers the user's question
- Compare multiple sources if available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Pull up to `MAX_RESULTS` entries out of an instant-answer payload.
/// Grouped topics (`{"Name": .., "Topics": [..]}`) are flattened in place.
pub fn parse_results(data: &Value) -> Vec<SearchResult> {
    fn collect(items: &[Value], out: &mut Vec<SearchResult>) {
        for item in items {
            if out.len() >= MAX_RESULTS {
                return;
            }
            if let Some(nested) = item.get("Topics").and_then(Value::as_array) {
                collect(nested, out);
                continue;
            }
            let text = item.get("Text").and_then(Value::as_str);
            let url = item.get("FirstURL").and_then(Value::as_str);
            if let (Some(text), Some(url)) = (text, url) {
                out.push(SearchResult {
                    title: truncate_chars(text, 100).to_string(),
                    url: url.to_string(),
                    snippet: truncate_chars(text, 200).to_string(),
                });
            }
        }
    }

    let mut results = Vec::new();
    if let Some(topics) = data.get("RelatedTopics").and_then(Value::as_array) {
        collect(topics, &mut results);
    }
    results
}

pub fn format_results(results: &[SearchResult]) -> String {
    let mut out = format!("Search Results:\n{}\n\n", "=".repeat(50));
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}\n   {}\n   URL: {}\n\n",
            i + 1,
            result.title,
            result.snippet,
            result.url
        ));
    }
    out
}

fn portfolio_section(content: &PortfolioContent) -> String {
    let services: Vec<String> = content
        .services
        .iter()
        .map(|s| format!("   - {}: {}", or_na(&s.title), or_na(&s.description)))
        .collect();
    let projects: Vec<String> = content
        .projects
        .iter()
        .map(|p| {
            format!(
                "   - {}: {}...",
                or_na(&p.title),
                truncate_chars(or_na(&p.description), 100)
            )
        })
        .collect();
    let name = or_na(&content.name);
    let email = or_na(&content.contact.email);

    format!(
        "\n\n=== PORTFOLIO ===\n\nYou also have access to {name}'s portfolio:\n\nABOUT:\n   Name: {name}\n   Title: {title}\n   Bio: {bio}\n\nSERVICES OFFERED:\n{services}\n\nFEATURED PROJECTS:\n{projects}\n\nCONTACT:\n   Email: {email}\n\nWhen users ask about:\n- Services -> Reference the services above\n- Hiring -> Direct to {email}\n- Projects or case studies -> Reference the projects above\n- Who built this -> Share {name}'s info\n",
        name = name,
        title = or_na(&content.title),
        bio = or_na(&content.bio),
        services = services.join("\n"),
        projects = projects.join("\n"),
        email = email,
    )
}

pub fn system_prompt(portfolio: &PortfolioContent) -> String {
    if portfolio.is_empty() {
        BASE_PROMPT.to_string()
    } else {
        format!("{}{}", BASE_PROMPT, portfolio_section(portfolio))
    }
}

pub struct WebSearchTool {
    descriptor: ToolDescriptor,
    endpoint: String,
    http: Client,
}

impl WebSearchTool {
    pub fn new(endpoint: impl Into<String>, portfolio: Arc<PortfolioContent>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(TOOLKIT_USER_AGENT)
            .timeout(SEARCH_TIMEOUT)
            .build()
            .map_err(|e| ToolkitError::Other(format!("Failed to build search client: {}", e)))?;

        Ok(Self {
            descriptor: ToolDescriptor {
                name: "Web Search".to_string(),
                description: "Search the internet for information and answer questions about the portfolio owner.".to_string(),
                version: "2.0".to_string(),
                kind: "WebSearchTool",
                system_prompt: system_prompt(&portfolio),
            },
            endpoint: endpoint.into(),
            http,
        })
    }

    pub async fn search(&self, query: &str) -> std::result::Result<Vec<SearchResult>, reqwest::Error> {
        debug!(endpoint = %self.endpoint, query = %query, "searching");
        let data: Value = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_redirect", "1"),
                ("no_html", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(parse_results(&data))
    }

    pub async fn run(&self, input: &str) -> String {
        let query = input.trim();
        if query.is_empty() {
            return "Please provide a search query.".to_string();
        }

        match self.search(query).await {
            Ok(results) if results.is_empty() => format!("No results found for: {}", query),
            Ok(results) => format_results(&results),
            Err(e) => format!(
                "Error performing search: {}\n\nNote: Web search requires internet connection.",
                e
            ),
        }
    }
}

impl Tool for WebSearchTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn execute<'a>(&'a self, input: &'a str) -> ToolFuture<'a> {
        self.run(input).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_flattens_groups_and_caps_results() {
        let data = json!({
            "RelatedTopics": [
                {"Text": "Rust is a language", "FirstURL": "https://duckduckgo.com/Rust"},
                {"Name": "See also", "Topics": [
                    {"Text": "Cargo", "FirstURL": "https://duckduckgo.com/Cargo"},
                    {"Text": "Crates", "FirstURL": "https://duckduckgo.com/Crates"}
                ]},
                {"Text": "no url here"},
                {"Text": "Four", "FirstURL": "https://4"},
                {"Text": "Five", "FirstURL": "https://5"},
                {"Text": "Six", "FirstURL": "https://6"}
            ]
        });
        let results = parse_results(&data);
        assert_eq!(results.len(), MAX_RESULTS);
        assert_eq!(results[1].title, "Cargo");
        assert_eq!(results[4].url, "https://5");
    }

    #[test]
    fn test_long_text_is_truncated() {
        let text = "x".repeat(300);
        let data = json!({"RelatedTopics": [{"Text": text, "FirstURL": "u"}]});
        let results = parse_results(&data);
        assert_eq!(results[0].title.len(), 100);
        assert_eq!(results[0].snippet.len(), 200);
    }

    #[test]
    fn test_format() {
        let formatted = format_results(&[SearchResult {
            title: "T".into(),
            url: "https://t".into(),
            snippet: "S".into(),
        }]);
        assert!(formatted.starts_with("Search Results:\n====="));
        assert!(formatted.contains("1. T\n   S\n   URL: https://t\n\n"));
    }

    #[test]
    fn test_prompt_mentions_portfolio_only_when_present() {
        assert!(!system_prompt(&PortfolioContent::default()).contains("=== PORTFOLIO ==="));
        let content = PortfolioContent {
            name: "Ada".into(),
            ..Default::default()
        };
        let prompt = system_prompt(&content);
        assert!(prompt.contains("=== PORTFOLIO ==="));
        assert!(prompt.contains("Name: Ada"));
    }
}
