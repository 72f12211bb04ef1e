use colored::*;

use crate::modelfile::GeneratedModelfile;
use crate::tools::ToolDescriptor;
use crate::ui::highlight::Highlighter;

pub fn display_tool_result(name: &str, result: &str) {
    let label = format!("TOOL: {}", name);
    print!("{}", Highlighter::new().labelled(&label, result));
}

/// Chat responses may contain fenced code
pub fn display_content(content: &str) {
    let rendered = Highlighter::new().render(content);
    println!("{}", rendered.trim_end());
}

pub fn display_tools(tools: &[&ToolDescriptor]) {
    println!("{}", format!("Available tools ({}):", tools.len()).bold());
    for descriptor in tools {
        println!(
            "  {} {} {}",
            descriptor.id().cyan(),
            format!("v{}", descriptor.version).dimmed(),
            descriptor.name
        );
        println!("      {}", descriptor.description.dimmed());
    }
}

pub fn display_generated(generated: &[GeneratedModelfile], descriptors: &[&ToolDescriptor]) {
    for (modelfile, descriptor) in generated.iter().zip(descriptors) {
        println!("{} Created: {}", "✓".green(), modelfile.path.display());
        println!("  Model name: {}", modelfile.model_name);
        println!("  Description: {}", descriptor.description);
        println!();
    }
}

pub fn display_banner(title: &str) {
    let rule = "=".repeat(60);
    println!("{}", rule);
    println!("{}", title.bold());
    println!("{}", rule);
    println!();
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}
