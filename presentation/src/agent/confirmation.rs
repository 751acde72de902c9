//! Console confirmation prompt for risky tool invocations.
//!
//! ```text
//! ⚠  write_file [medium]
//!    medium-risk tool
//!    path=src/lib.rs
//! Proceed? [y/N]
//! ```

use async_trait::async_trait;
use colored::Colorize;
use shipwright_domain::{ConfirmAction, ConfirmationRequest, RiskLevel};
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Asks on the terminal. Anything but `y`/`yes` declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleConfirmation;

impl ConsoleConfirmation {
    pub fn new() -> Self {
        Self
    }

    fn render(request: &ConfirmationRequest) -> String {
        let risk = match request.risk_level {
            RiskLevel::High => request.risk_level.as_str().red().bold(),
            RiskLevel::Medium => request.risk_level.as_str().yellow().bold(),
            RiskLevel::Low => request.risk_level.as_str().normal(),
        };
        let mut out = format!(
            "\n{} {} [{}]\n   {}\n",
            "⚠".yellow(),
            request.tool_name.cyan().bold(),
            risk,
            request.reason
        );
        if !request.summary.is_empty() {
            out.push_str(&format!("   {}\n", request.summary.dimmed()));
        }
        out
    }

    fn prompt_blocking(rendered: String) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}{} ", rendered, "Proceed? [y/N]".bold())?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}

/// `y` or `yes`, case-insensitive.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl ConfirmAction for ConsoleConfirmation {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool {
        let rendered = Self::render(request);
        match tokio::task::spawn_blocking(move || Self::prompt_blocking(rendered)).await {
            Ok(Ok(answer)) => is_affirmative(&answer),
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to read confirmation, declining");
                false
            }
            Err(e) => {
                warn!(error = %e, "Confirmation prompt task failed, declining");
                false
            }
        }
    }
}
