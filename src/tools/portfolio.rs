use futures::future::{self, FutureExt};
use serde_json::Value;
use std::sync::Arc;

use super::{truncate_chars, Tool, ToolDescriptor, ToolFuture};
use crate::portfolio::{or_na, PortfolioContent};

fn build_system_prompt(content: &PortfolioContent) -> String {
    let services: Vec<String> = content
        .services
        .iter()
        .map(|s| format!("   - {}", or_na(&s.title)))
        .collect();
    let projects: Vec<String> = content
        .projects
        .iter()
        .map(|p| format!("   - {}", or_na(&p.title)))
        .collect();

    format!(
        "You are an assistant for a consulting portfolio. You have access to the full portfolio data and can help with:

1. PORTFOLIO INFORMATION:
   - Bio and professional summary
   - Services offered
   - Project portfolio and case studies
   - Contact information

2. PORTFOLIO OWNER:
   Name: {name}
   Title: {title}
   Headline: {headline}
   Email: {email}

3. KEY SERVICES:
{services}

4. FEATURED PROJECTS:
{projects}

When users ask about the portfolio, services, projects, or how to get in touch:
- Provide accurate information from the portfolio
- Be professional and helpful
- Highlight relevant services based on user needs
- Direct inquiries to {email}",
        name = or_na(&content.name),
        title = or_na(&content.title),
        headline = or_na(&content.headline),
        email = or_na(&content.contact.email),
        services = services.join("\n"),
        projects = projects.join("\n"),
    )
}

/// Read-only questions about the portfolio document
pub struct PortfolioTool {
    descriptor: ToolDescriptor,
    content: Arc<PortfolioContent>,
}

impl PortfolioTool {
    pub fn new(content: Arc<PortfolioContent>) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "Consulting Portfolio".to_string(),
                description: "Answer questions about the consulting portfolio: bio, services, projects, and contact details.".to_string(),
                version: "1.0".to_string(),
                kind: "ConsultingTool",
                system_prompt: build_system_prompt(&content),
            },
            content,
        }
    }

    pub fn answer(&self, input: &str) -> String {
        let command = input.trim();
        if command.is_empty() {
            return self.summary();
        }

        if let Some((action, params)) = command.split_once(':') {
            match action.trim().to_uppercase().as_str() {
                "GET" => return self.field(params),
                "LIST" => return self.field_names(),
                _ => {}
            }
        }

        let query = command.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| query.contains(w));

        if mentions(&["bio", "about", "summary"]) {
            self.bio()
        } else if mentions(&["service", "offer", "what do"]) {
            self.services()
        } else if mentions(&["project", "work", "portfolio", "case"]) {
            self.projects()
        } else if mentions(&["contact", "email", "reach", "hire"]) {
            self.contact()
        } else {
            self.summary()
        }
    }

    pub fn summary(&self) -> String {
        let c = &*self.content;
        let mut out = format!(
            "{rule}\nPORTFOLIO: {name}\n{rule}\n\nTITLE: {title}\nHEADLINE: {headline}\n\nBIO:\n{bio}\n\nSERVICES ({count}):\n",
            rule = "=".repeat(43),
            name = or_na(&c.name),
            title = or_na(&c.title),
            headline = or_na(&c.headline),
            bio = or_na(&c.bio),
            count = c.services.len(),
        );
        for (i, service) in c.services.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {}\n     {}\n\n",
                i + 1,
                or_na(&service.title),
                or_na(&service.description)
            ));
        }

        out.push_str(&format!("\nPROJECTS ({}):\n", c.projects.len()));
        for (i, project) in c.projects.iter().enumerate() {
            let description = or_na(&project.description);
            let short = truncate_chars(description, 100);
            let ellipsis = if short.len() < description.len() { "..." } else { "" };
            out.push_str(&format!(
                "  {}. {}\n     {}{}\n\n",
                i + 1,
                or_na(&project.title),
                short,
                ellipsis
            ));
        }

        out.push_str(&format!(
            "\nCONTACT:\n  Email: {}\n  Call to Action: {}\n",
            or_na(&c.contact.email),
            or_na(&c.contact.call_to_action)
        ));
        out
    }

    fn bio(&self) -> String {
        let c = &*self.content;
        format!(
            "NAME: {}\nTITLE: {}\nHEADLINE: {}\n\nBIO:\n{}\n",
            or_na(&c.name),
            or_na(&c.title),
            or_na(&c.headline),
            or_na(&c.bio)
        )
    }

    fn services(&self) -> String {
        let services = &self.content.services;
        if services.is_empty() {
            return "No services defined yet.".to_string();
        }

        let mut out = format!("SERVICES OFFERED ({}):\n{}\n\n", services.len(), "=".repeat(40));
        for (i, service) in services.iter().enumerate() {
            out.push_str(&format!(
                "{}. {}\n   {}\n\n",
                i + 1,
                or_na(&service.title),
                or_na(&service.description)
            ));
        }
        out
    }

    fn projects(&self) -> String {
        let projects = &self.content.projects;
        if projects.is_empty() {
            return "No projects defined yet.".to_string();
        }

        let mut out = format!("PROJECT PORTFOLIO ({}):\n{}\n\n", projects.len(), "=".repeat(40));
        for (i, project) in projects.iter().enumerate() {
            out.push_str(&format!(
                "{}. {}\n   {}\n",
                i + 1,
                or_na(&project.title),
                or_na(&project.description)
            ));
            if let Some(link) = project.public_link() {
                out.push_str(&format!("   Live: {}\n", link));
            }
            out.push('\n');
        }
        out
    }

    fn contact(&self) -> String {
        let contact = &self.content.contact;
        format!(
            "CONTACT INFORMATION\n{}\n\nEmail: {}\n\nSocial Links:\n- LinkedIn: {}\n- GitHub: {}\n- Twitter: {}\n\nCall to Action: {}\n",
            "=".repeat(18),
            or_na(&contact.email),
            or_na(&contact.social.linkedin),
            or_na(&contact.social.github),
            or_na(&contact.social.twitter),
            or_na(&contact.call_to_action)
        )
    }

    fn field(&self, name: &str) -> String {
        let key = name.trim().to_lowercase();
        let fields = self.content.fields();
        match fields.get(&key) {
            Some(Value::String(s)) => s.clone(),
            Some(value @ (Value::Object(_) | Value::Array(_))) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Some(other) => other.to_string(),
            None => format!(
                "Field '{}' not found. Available fields: {}",
                key,
                format_field_names(&fields)
            ),
        }
    }

    fn field_names(&self) -> String {
        format!("Available fields: {}", format_field_names(&self.content.fields()))
    }
}

fn format_field_names(fields: &std::collections::BTreeMap<String, Value>) -> String {
    let names: Vec<String> = fields.keys().map(|k| format!("'{}'", k)).collect();
    format!("[{}]", names.join(", "))
}

impl Tool for PortfolioTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn execute<'a>(&'a self, input: &'a str) -> ToolFuture<'a> {
        future::ready(self.answer(input)).boxed()
    }

    // Blank input asks for the summary
    fn validate_input(&self, _input: &str) -> bool {
        true
    }
}
