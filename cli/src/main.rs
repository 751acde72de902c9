//! CLI entrypoint for shipwright
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use shipwright_application::{
    AgentProgressNotifier, AgentRuntime, Assistant, DispatchGuard, ExecutionParams,
    NoAgentProgress, ToolDispatcherPort,
};
use shipwright_domain::{
    ConfirmAction, ExecutionContext, LlmConfig, NeverConfirm, ProviderKind, SafetyGate,
};
use shipwright_infrastructure::mcp::global_registry_path;
use shipwright_infrastructure::providers::client::resolve_api_key;
use shipwright_infrastructure::{
    BuiltinProvider, ConfigLoader, FileConfig, HttpLlmClient, LocalContextLoader, ToolRegistry,
    connect_configured_servers, load_policy,
};
use shipwright_presentation::{AgentRepl, Cli, ConsoleConfirmation, ConsoleProgress};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Held until exit so buffered file logs get flushed
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    info!("Starting shipwright");

    let working_dir = match &cli.workdir {
        Some(dir) => dir
            .canonicalize()
            .with_context(|| format!("Working directory not found: {}", dir.display()))?,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref(), &working_dir)?
    };

    let llm_config = build_llm_config(&config, &cli)?;
    // Fail before the first request rather than on it
    resolve_api_key(&llm_config)?;
    info!(provider = %llm_config.provider, model = %llm_config.model, "LLM backend selected");

    let params = build_execution_params(&config, &cli);
    let mut repl = AgentRepl::new(build_assistant(&config, &cli, llm_config, &params, working_dir).await?);

    match cli.prompt {
        Some(prompt) => {
            let ok = repl.process_request(&prompt).await;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        None => {
            repl.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Console logging filtered by `-v` count (overridden by `RUST_LOG`),
/// plus an optional daily rotated log file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "shipwright.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Config-file LLM settings with `--provider` / `--model` applied.
///
/// Switching provider drops the file's model, key and base URL, which
/// belong to the other backend.
fn build_llm_config(config: &FileConfig, cli: &Cli) -> Result<LlmConfig> {
    let mut llm = config.to_llm_config()?;

    if let Some(provider) = &cli.provider {
        let kind: ProviderKind = provider.parse()?;
        if kind != llm.provider {
            llm = LlmConfig {
                max_tokens: llm.max_tokens,
                temperature: llm.temperature,
                ..LlmConfig::new(kind)
            };
        }
    }
    if let Some(model) = &cli.model {
        llm = llm.with_model(model);
    }
    Ok(llm)
}

fn build_execution_params(config: &FileConfig, cli: &Cli) -> ExecutionParams {
    let mut params = config.to_execution_params();
    if cli.yes {
        params = params.with_auto_confirm(true);
    }
    if let Some(max_loops) = cli.max_loops {
        params = params.with_max_loops(max_loops as usize);
    }
    params
}

async fn build_assistant(
    config: &FileConfig,
    cli: &Cli,
    llm_config: LlmConfig,
    params: &ExecutionParams,
    working_dir: PathBuf,
) -> Result<Assistant> {
    // === Dependency Injection ===
    let llm = Arc::new(HttpLlmClient::new(llm_config));

    let mut registry = ToolRegistry::new()
        .register(BuiltinProvider::new().with_command_timeout(config.tools.command_timeout()));
    if config.tools.mcp_enabled && !cli.no_mcp {
        let global = global_registry_path();
        for server in connect_configured_servers(global.as_deref(), &working_dir).await {
            registry = registry.register(server);
        }
    }
    let registry = Arc::new(registry);
    let tool_count = registry.refresh().await;
    info!(tools = tool_count, providers = ?registry.provider_ids(), "Tool registry ready");

    let policy = load_policy(&working_dir)?;

    let confirmer: Arc<dyn ConfirmAction> = if std::io::stdin().is_terminal() {
        Arc::new(ConsoleConfirmation::new())
    } else {
        warn!("stdin is not a terminal: risky tools will be declined");
        Arc::new(NeverConfirm)
    };

    let project = LocalContextLoader::new().load(&working_dir);
    let context = ExecutionContext::new(working_dir, confirmer, Arc::new(policy));

    let progress: Arc<dyn AgentProgressNotifier> = if cli.quiet {
        Arc::new(NoAgentProgress)
    } else if cli.verbose > 0 {
        Arc::new(ConsoleProgress::verbose())
    } else {
        Arc::new(ConsoleProgress::new())
    };

    let guard = DispatchGuard::new(registry, SafetyGate::new(params.auto_confirm));
    let runtime = AgentRuntime::new(llm, guard, context)
        .with_project(Arc::new(project))
        .with_progress(progress);

    Ok(Assistant::new(params.main_agent_config(), runtime))
}
