use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aitk")]
#[command(about = "AI Toolkit: custom Ollama tool models and a portfolio site", long_about = None)]
pub struct Args {
    #[arg(short = 'v', long = "verbose", global = true, help = "Show debug logging")]
    pub verbose: bool,

    #[arg(long = "config", global = true, help = "Path to a YAML or JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(
        long = "ollama-url",
        global = true,
        help = "Ollama base URL (e.g., http://localhost:11434)"
    )]
    pub ollama_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a Modelfile for every tool
    Setup {
        #[arg(long = "create", help = "Also create the models in Ollama")]
        create: bool,

        #[arg(short = 'o', long = "output", help = "Directory to write Modelfiles into")]
        output: Option<PathBuf>,
    },

    /// List registered tools
    Tools,

    /// Export the tool manifest as JSON
    Manifest {
        #[arg(short = 'o', long = "output", help = "File to write (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Run a tool directly
    Run {
        #[arg(help = "Tool name, e.g. calculator or \"note taking\"")]
        tool: String,

        #[arg(help = "Input passed to the tool")]
        input: Vec<String>,
    },

    /// Send one prompt to a text-generation backend
    Chat {
        #[arg(short = 'p', long = "provider", value_enum, default_value_t = Provider::Ollama)]
        provider: Provider,

        #[arg(short = 'm', long = "model", help = "Model to use (defaults to AI_MODEL)")]
        model: Option<String>,

        #[arg(help = "Prompt to send")]
        prompt: Vec<String>,
    },

    /// Check whether the local runtime is reachable
    Status,

    /// Portfolio site
    Site {
        #[command(subcommand)]
        action: SiteCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SiteCommand {
    /// Render the portfolio page to an HTML file
    Build {
        #[arg(short = 'o', long = "output", default_value = "site/index.html")]
        output: PathBuf,
    },

    /// Serve the portfolio page over HTTP
    Serve {
        #[arg(long = "host")]
        host: Option<String>,

        #[arg(long = "port")]
        port: Option<u16>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    Openai,
    Gemini,
}
