use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

use ai_toolkit::api::{ChatBackend, GenerationRequest, OllamaClient};
use ai_toolkit::cli::{Args, Command, Provider, SiteCommand};
use ai_toolkit::config::Config;
use ai_toolkit::error::{Result, ToolkitError};
use ai_toolkit::logging;
use ai_toolkit::modelfile::{self, ModelfileOptions};
use ai_toolkit::portfolio::{self, PortfolioContent};
use ai_toolkit::tools::{ToolContext, ToolRegistry};
use ai_toolkit::ui::output;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            output::display_error(&e);
            process::exit(1);
        }
    };

    logging::init(&config);

    if let Err(e) = run(args.command, &config).await {
        output::display_error(&e.to_string());
        process::exit(1);
    }
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Setup { create, output } => setup(config, create, output).await,
        Command::Tools => {
            let registry = build_registry(config)?;
            output::display_tools(&registry.descriptors());
            Ok(())
        }
        Command::Manifest { output } => manifest(config, output),
        Command::Run { tool, input } => run_tool(config, &tool, &input.join(" ")).await,
        Command::Chat {
            provider,
            model,
            prompt,
        } => chat(config, provider, model, &prompt.join(" ")).await,
        Command::Status => status(config).await,
        Command::Site { action } => site(config, action).await,
    }
}

fn build_registry(config: &Config) -> Result<ToolRegistry> {
    ToolRegistry::with_default_tools(&ToolContext::from_config(config))
}

async fn setup(config: &Config, create: bool, output_dir: Option<PathBuf>) -> Result<()> {
    let registry = build_registry(config)?;
    let dir = output_dir.unwrap_or_else(|| config.modelfiles_dir.clone());

    output::display_banner("AI TOOLKIT - Custom Ollama Models Setup");
    println!("Generating Modelfiles in: {}", dir.display());
    println!();

    let generated =
        modelfile::generate_all(&registry, &dir, &ModelfileOptions::from_config(config))?;
    output::display_generated(&generated, &registry.descriptors());

    if !create {
        modelfile::print_next_steps(&generated, &config.runtime_command);
        return Ok(());
    }

    let outcomes = modelfile::register_all(&generated, &config.runtime_command).await?;
    let failed: Vec<_> = outcomes.iter().filter(|o| !o.succeeded()).collect();

    println!("\n{}", "=".repeat(60));
    if failed.is_empty() {
        println!("{}", "Setup complete!".green().bold());
        println!("Your custom models are now available in Ollama:");
        for outcome in &outcomes {
            println!("  • {}", outcome.model_name);
        }
        return Ok(());
    }

    let first = failed[0];
    Err(ToolkitError::RegistrationError {
        model: first.model_name.clone(),
        message: format!(
            "{} of {} models could not be created ({})",
            failed.len(),
            outcomes.len(),
            first.error.as_deref().unwrap_or("unknown error")
        ),
    })
}

fn manifest(config: &Config, output_file: Option<PathBuf>) -> Result<()> {
    let registry = build_registry(config)?;
    match output_file {
        Some(path) => {
            let manifest = registry.export_manifest(&path)?;
            println!(
                "{} Exported {} tools to {}",
                "✓".green(),
                manifest.tools.len(),
                path.display()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&registry.manifest())?),
    }
    Ok(())
}

async fn run_tool(config: &Config, name: &str, input: &str) -> Result<()> {
    let registry = build_registry(config)?;
    let Some(tool) = registry.get(name) else {
        return Err(ToolkitError::Other(format!(
            "Tool '{}' not found. Available tools: {}",
            name,
            registry.list().join(", ")
        )));
    };
    let display_name = tool.descriptor().name.clone();

    let result = registry.execute(name, input).await;
    output::display_tool_result(&display_name, &result);
    Ok(())
}

async fn chat(
    config: &Config,
    provider: Provider,
    model: Option<String>,
    prompt: &str,
) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(ToolkitError::Other("Please provide a prompt".to_string()));
    }

    let backend = ChatBackend::from_config(provider, config)?;
    let model = model.unwrap_or_else(|| backend.default_model(config));
    let request = GenerationRequest::new(model, prompt)
        .with_sampling(config.temperature, config.max_tokens);

    debug!(provider = backend.name(), model = %request.model, "sending prompt");

    let text = backend.generate(&request).await?;
    output::display_content(&text);
    Ok(())
}

async fn status(config: &Config) -> Result<()> {
    let client = OllamaClient::from_config(config)?;

    if !client.is_available().await {
        println!(
            "{} Ollama is not reachable at {}",
            "✗".red(),
            client.base_url()
        );
        return Err(ToolkitError::Other(
            "Start Ollama with 'ollama serve' and try again".to_string(),
        ));
    }

    println!("{} Ollama is running at {}", "✓".green(), client.base_url());
    let models = client.list_models().await;
    if models.is_empty() {
        println!("  No models installed");
    }
    for model in &models {
        let marker = if model.contains("-helper") {
            "(tool)".cyan()
        } else {
            "".normal()
        };
        println!("  • {} {}", model, marker);
    }
    Ok(())
}

fn load_site_content(config: &Config) -> Result<PortfolioContent> {
    Ok(PortfolioContent::load(Path::new(&config.site.content_file))?)
}

async fn site(config: &Config, action: SiteCommand) -> Result<()> {
    let content = load_site_content(config)?;
    match action {
        SiteCommand::Build { output: path } => {
            portfolio::render_to_file(&content, &path)?;
            println!("{} Wrote {}", "✓".green(), path.display());
            Ok(())
        }
        SiteCommand::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.site.host.clone());
            let port = port.unwrap_or(config.site.port);
            println!(
                "{} Serving portfolio at {}",
                "→".cyan(),
                format!("http://{}:{}", host, port).bold()
            );
            portfolio::serve(&content, &config.site.assets_dir, &host, port).await
        }
    }
}
