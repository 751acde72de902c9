//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for shipwright
#[derive(Parser, Debug)]
#[command(name = "shipwright")]
#[command(author, version, about = "Terminal coding assistant with a bounded tool-using agent loop")]
#[command(long_about = r#"
Shipwright runs a tool-using coding agent against your working directory.

Without a prompt it starts an interactive session. Prefix a request with
@<preset> (e.g. "@test write a unit test for util") to hand it to a
focused sub-agent.

Configuration files are loaded from (in priority order):
1. SHIPWRIGHT_* environment variables (e.g. SHIPWRIGHT_LLM__MODEL)
2. --config <path>          Explicit config file
3. ./shipwright.toml        Project-level config
4. ~/.config/shipwright/config.toml   Global config

Example:
  shipwright "explain what src/main.rs does"
  shipwright --provider ollama --model qwen2.5-coder
  shipwright --yes "@refactor split the parser module"
"#)]
pub struct Cli {
    /// Run a single request and exit (interactive session when omitted)
    pub prompt: Option<String>,

    /// LLM backend (anthropic, openai, deepseek, groq, openrouter, ollama)
    #[arg(short, long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Model name for the selected backend
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Run medium-risk tools without asking (high-risk tools still ask)
    #[arg(short, long)]
    pub yes: bool,

    /// Iteration cap for the main agent
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_loops: Option<u64>,

    /// Do not start the MCP servers from mcp.json
    #[arg(long)]
    pub no_mcp: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the progress spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Also write logs to a daily rotated file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Working directory for tools (defaults to the current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,
}
