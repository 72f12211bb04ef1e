use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Static document behind the portfolio page and the portfolio tools.
/// Every field is optional in the JSON; missing ones fall back to empty values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioContent {
    pub name: String,
    pub title: String,
    pub headline: String,
    pub bio: String,
    pub services: Vec<Service>,
    pub projects: Vec<Project>,
    pub contact: Contact,
    /// Keys this model does not know about, kept so GET can still answer them
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_link: Option<String>,
}

impl Project {
    /// Link worth showing; "#!" is a placeholder in hand-written content
    pub fn public_link(&self) -> Option<&str> {
        self.live_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty() && *link != "#!")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    pub call_to_action: String,
    pub social: Social,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Social {
    pub linkedin: String,
    pub github: String,
    pub twitter: String,
}

/// Placeholder for empty text fields in plain-text output
pub fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

impl PortfolioContent {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read portfolio content: {}", path.display()))?;
        let content: PortfolioContent = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse portfolio content: {}", path.display()))?;
        debug!(
            path = %path.display(),
            services = content.services.len(),
            projects = content.projects.len(),
            "loaded portfolio content"
        );
        Ok(content)
    }

    /// Tools still work without a portfolio; they just have nothing to report
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no portfolio content file");
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!("{:#}", e);
            Self::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Top-level JSON view, used for field lookups by name
    pub fn fields(&self) -> BTreeMap<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let content: PortfolioContent =
            serde_json::from_str(r#"{"name": "Ada", "projects": [{"title": "Engine"}]}"#).unwrap();
        assert_eq!(content.name, "Ada");
        assert_eq!(content.bio, "");
        assert!(content.services.is_empty());
        assert_eq!(content.projects[0].title, "Engine");
        assert_eq!(content.projects[0].live_link, None);
        assert_eq!(content.contact.social.github, "");
    }

    #[test]
    fn test_camel_case_keys_and_extras() {
        let content: PortfolioContent = serde_json::from_str(
            r##"{
                "projects": [{"title": "A", "liveLink": "#!"}, {"title": "B", "liveLink": "https://b.dev"}],
                "contact": {"email": "a@b.c", "callToAction": "Say hi"},
                "location": "Remote"
            }"##,
        )
        .unwrap();
        assert_eq!(content.projects[0].public_link(), None);
        assert_eq!(content.projects[1].public_link(), Some("https://b.dev"));
        assert_eq!(content.contact.call_to_action, "Say hi");
        assert_eq!(content.extra.get("location"), Some(&Value::from("Remote")));
        assert!(content.fields().contains_key("location"));
        assert!(content.fields().contains_key("services"));
    }

    #[test]
    fn test_empty_document_is_empty() {
        let content: PortfolioContent = serde_json::from_str("{}").unwrap();
        assert!(content.is_empty());
        assert_eq!(or_na(""), "N/A");
    }
}
