//! Progress reporting for agent execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use shipwright_application::AgentProgressNotifier;
use shipwright_domain::core::string::truncate;
use shipwright_domain::{ToolCall, ToolResult};
use std::sync::Mutex;
use std::time::Duration;

const ARGS_DISPLAY_LEN: usize = 60;

/// Spinner while the model thinks, one line per tool call.
pub struct ConsoleProgress {
    spinner: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            verbose: false,
        }
    }

    /// Also print tool arguments and successful results
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Self::new()
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear_spinner(&self) {
        let mut slot = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pb) = slot.take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentProgressNotifier for ConsoleProgress {
    fn on_model_call_start(&self, agent: &str, iteration: usize) {
        self.clear_spinner();

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(agent.to_string());
        pb.set_message(format!("thinking (step {})", iteration));
        pb.enable_steady_tick(Duration::from_millis(100));

        *self.spinner.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_model_call_end(&self, _agent: &str, _tool_calls: usize) {
        // The confirmation prompt may follow; it must not fight the spinner.
        self.clear_spinner();
    }

    fn on_tool_call(&self, call: &ToolCall) {
        if self.verbose {
            let args = truncate(&call.arguments_json().to_string(), ARGS_DISPLAY_LEN);
            println!("  {} {} {}", "🔧".dimmed(), call.tool_name.cyan(), args.dimmed());
        } else {
            println!("  {} {}", "🔧".dimmed(), call.tool_name.cyan());
        }
    }

    fn on_tool_result(&self, call: &ToolCall, result: &ToolResult) {
        if result.success {
            if self.verbose {
                println!("  {} {} {}", "✓".green(), call.tool_name.green(), "OK".dimmed());
            }
        } else {
            println!(
                "  {} {} {}",
                "✗".red(),
                call.tool_name.red(),
                result.error_message().unwrap_or("failed").dimmed()
            );
        }
    }

    fn on_loop_limit(&self, agent: &str, max_loops: usize) {
        self.clear_spinner();
        println!(
            "  {} {} stopped after {} steps",
            "ℹ".yellow(),
            agent,
            max_loops
        );
    }

    fn on_sub_agent_start(&self, preset: &str, task: &str) {
        println!(
            "{} {} {}",
            "→".blue(),
            format!("@{}", preset).magenta().bold(),
            truncate(task, ARGS_DISPLAY_LEN).dimmed()
        );
    }

    fn on_sub_agent_end(&self, preset: &str) {
        self.clear_spinner();
        if self.verbose {
            println!("{} {} finished", "←".blue(), format!("@{}", preset).magenta());
        }
    }
}
