use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

use super::content::PortfolioContent;
use crate::error::Result;

pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the whole page. Every service and project title appears once.
pub fn render_page(content: &PortfolioContent) -> String {
    let mut html = String::new();
    let name = html_escape(&content.name);
    let title = html_escape(&content.title);

    let page_title = match (content.name.is_empty(), content.title.is_empty()) {
        (false, false) => format!("{} | {}", name, title),
        (false, true) => name.clone(),
        (true, false) => title.clone(),
        (true, true) => "Portfolio".to_string(),
    };

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "  <title>{}</title>", page_title);
    html.push_str("  <link rel=\"stylesheet\" href=\"/assets/style.css\">\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header class=\"hero\">\n");
    let _ = writeln!(html, "  <h1>{}</h1>", name);
    if !content.title.is_empty() {
        let _ = writeln!(html, "  <p class=\"title\">{}</p>", title);
    }
    if !content.headline.is_empty() {
        let _ = writeln!(
            html,
            "  <p class=\"headline\">{}</p>",
            html_escape(&content.headline)
        );
    }
    html.push_str("</header>\n<main>\n");

    if !content.bio.is_empty() {
        html.push_str("<section id=\"about\">\n  <h2>About</h2>\n");
        for paragraph in content.bio.split("\n\n").filter(|p| !p.trim().is_empty()) {
            let _ = writeln!(html, "  <p>{}</p>", html_escape(paragraph.trim()));
        }
        html.push_str("</section>\n");
    }

    html.push_str("<section id=\"services\">\n  <h2>Services</h2>\n");
    if content.services.is_empty() {
        html.push_str("  <p class=\"empty\">No services listed yet.</p>\n");
    } else {
        html.push_str("  <div class=\"grid\">\n");
        for service in &content.services {
            let _ = write!(
                html,
                "    <article class=\"card\">\n      <h3>{}</h3>\n      <p>{}</p>\n    </article>\n",
                html_escape(&service.title),
                html_escape(&service.description)
            );
        }
        html.push_str("  </div>\n");
    }
    html.push_str("</section>\n");

    html.push_str("<section id=\"projects\">\n  <h2>Projects</h2>\n");
    if content.projects.is_empty() {
        html.push_str("  <p class=\"empty\">No projects listed yet.</p>\n");
    } else {
        html.push_str("  <div class=\"grid\">\n");
        for project in &content.projects {
            html.push_str("    <article class=\"card project\">\n");
            if let Some(image) = project.image.as_deref().filter(|i| !i.is_empty()) {
                // alt stays empty: the heading right below already names the project
                let _ = writeln!(
                    html,
                    "      <img src=\"{}\" alt=\"\" loading=\"lazy\">",
                    html_escape(image)
                );
            }
            let _ = writeln!(html, "      <h3>{}</h3>", html_escape(&project.title));
            let _ = writeln!(html, "      <p>{}</p>", html_escape(&project.description));
            if let Some(link) = project.public_link() {
                let _ = writeln!(
                    html,
                    "      <a class=\"live\" href=\"{}\" rel=\"noopener\">View live</a>",
                    html_escape(link)
                );
            }
            html.push_str("    </article>\n");
        }
        html.push_str("  </div>\n");
    }
    html.push_str("</section>\n");

    html.push_str(&render_contact(content));
    html.push_str("</main>\n");
    let _ = writeln!(html, "<footer>&copy; {}</footer>", name);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_contact(content: &PortfolioContent) -> String {
    let contact = &content.contact;
    let mut html = String::from("<section id=\"contact\">\n  <h2>Contact</h2>\n");

    if !contact.call_to_action.is_empty() {
        let _ = writeln!(html, "  <p>{}</p>", html_escape(&contact.call_to_action));
    }
    if !contact.email.is_empty() {
        let email = html_escape(&contact.email);
        let _ = writeln!(
            html,
            "  <p><a class=\"email\" href=\"mailto:{}\">{}</a></p>",
            email, email
        );
    }

    let social = [
        ("LinkedIn", contact.social.linkedin.as_str()),
        ("GitHub", contact.social.github.as_str()),
        ("Twitter", contact.social.twitter.as_str()),
    ];
    let links: Vec<_> = social.iter().filter(|(_, url)| !url.is_empty()).collect();
    if !links.is_empty() {
        html.push_str("  <ul class=\"social\">\n");
        for (label, url) in links {
            let _ = writeln!(
                html,
                "    <li><a href=\"{}\" rel=\"noopener\">{}</a></li>",
                html_escape(url),
                label
            );
        }
        html.push_str("  </ul>\n");
    }

    html.push_str("</section>\n");
    html
}

pub fn render_to_file(content: &PortfolioContent, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_page(content))?;
    info!(path = %path.display(), "wrote portfolio page");
    Ok(())
}
