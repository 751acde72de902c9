//! Console formatting for assistant replies and listings

use colored::Colorize;
use shipwright_application::{AssistantReply, Responder, RunAgentError};
use shipwright_domain::{LlmConfig, RiskLevel, SubAgentPreset, ToolDefinition};

pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format_reply(reply: &AssistantReply) -> String {
        let mut output = String::new();

        if let Responder::SubAgent(token) = &reply.responder {
            output.push_str(&format!("{}\n", format!("── @{} ──", token).magenta().bold()));
        }

        let text = reply.outcome.text.trim();
        if text.is_empty() {
            output.push_str(&format!("{}\n", "(no text response)".dimmed()));
        } else {
            output.push_str(text);
            output.push('\n');
        }

        if reply.outcome.loop_limit_reached {
            output.push_str(&format!(
                "\n{} Stopped at the iteration cap after {} model calls. \
                 Send a follow-up to continue.\n",
                "ℹ".yellow(),
                reply.outcome.iterations
            ));
        }
        output
    }

    pub fn format_error(error: &RunAgentError) -> String {
        format!(
            "{} {}\n{}",
            "Error:".red().bold(),
            error,
            "History before this request is kept; you can retry.".dimmed()
        )
    }

    pub fn format_tools(tools: &[ToolDefinition]) -> String {
        if tools.is_empty() {
            return "No tools available.\n".to_string();
        }
        let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
        let mut output = format!("{}\n", "Tools:".cyan().bold());
        for tool in tools {
            let risk = match tool.effective_risk() {
                RiskLevel::Low => "low".green(),
                RiskLevel::Medium => "medium".yellow(),
                RiskLevel::High => "high".red(),
            };
            output.push_str(&format!(
                "  {:<width$}  {:<6}  {}\n",
                tool.name,
                risk,
                first_line(&tool.description).dimmed(),
                width = width
            ));
        }
        output
    }

    pub fn format_presets(presets: &[SubAgentPreset]) -> String {
        let mut output = format!("{}\n", "Sub-agents:".cyan().bold());
        for preset in presets {
            output.push_str(&format!(
                "  {:<12} {} (max {} steps)\n",
                format!("@{}", preset.token).magenta(),
                preset.description,
                preset.max_loops
            ));
        }
        output
    }

    pub fn format_model(config: &LlmConfig) -> String {
        format!("{} {} / {}", "Model:".bold(), config.provider, config.model)
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}
