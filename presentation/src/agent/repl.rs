//! REPL (Read-Eval-Print Loop) for the assistant

use crate::output::ConsoleFormatter;
use colored::Colorize;
use shipwright_application::Assistant;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Slash commands understood by the REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Clear,
    Tools,
    Agents,
    /// `/model` alone shows the current model
    Model(Option<String>),
    Exit,
    Unknown(String),
}

impl ReplCommand {
    /// `None` when the line is a request rather than a command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("");
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        Some(match name {
            "help" | "h" | "?" => ReplCommand::Help,
            "clear" => ReplCommand::Clear,
            "tools" => ReplCommand::Tools,
            "agents" => ReplCommand::Agents,
            "model" => ReplCommand::Model(arg.map(str::to_string)),
            "exit" | "quit" | "q" => ReplCommand::Exit,
            _ => ReplCommand::Unknown(line.to_string()),
        })
    }
}

enum CommandResult {
    Continue,
    Exit,
}

/// Interactive session over one [`Assistant`]
pub struct AgentRepl {
    assistant: Assistant,
}

impl AgentRepl {
    pub fn new(assistant: Assistant) -> Self {
        Self { assistant }
    }

    /// Run the interactive REPL until `/exit` or end of input
    pub async fn run(&mut self) -> io::Result<()> {
        self.print_welcome();

        loop {
            let Some(line) = read_line("shipwright> ").await? else {
                println!("Bye!");
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(command) = ReplCommand::parse(line) {
                match self.handle_command(command).await {
                    CommandResult::Exit => break,
                    CommandResult::Continue => continue,
                }
            }

            self.process_request(line).await;
        }
        Ok(())
    }

    /// Handle one request; `false` when the provider failed
    pub async fn process_request(&mut self, request: &str) -> bool {
        match self.assistant.handle(request).await {
            Ok(reply) => {
                println!();
                print!("{}", ConsoleFormatter::format_reply(&reply));
                println!();
                true
            }
            Err(e) => {
                eprintln!("{}", ConsoleFormatter::format_error(&e));
                false
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "╭─────────────────────────────────────╮".cyan());
        println!("{}", "│             Shipwright              │".cyan());
        println!("{}", "╰─────────────────────────────────────╯".cyan());
        println!("{}", ConsoleFormatter::format_model(&self.assistant.llm_config()));
        println!(
            "{} {}",
            "Tools:".bold(),
            self.assistant.capabilities().len()
        );
        println!();
        println!("Type /help for commands, @<preset> <task> for a sub-agent.");
        println!();
    }

    fn print_help() {
        println!();
        println!("{}", "Commands:".cyan().bold());
        println!("  /help          Show this help");
        println!("  /clear         Clear the conversation history");
        println!("  /tools         Refresh and list available tools");
        println!("  /agents        List sub-agent presets");
        println!("  /model [name]  Show or switch the model");
        println!("  /exit          Quit");
        println!();
        println!("{}", "Sub-agents:".cyan().bold());
        println!("  @<preset> <task>   e.g. @test write a unit test for util");
        println!();
    }

    async fn handle_command(&mut self, command: ReplCommand) -> CommandResult {
        match command {
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Clear => {
                self.assistant.clear_history();
                println!("Conversation history cleared.");
            }
            ReplCommand::Tools => {
                let count = self.assistant.refresh_tools().await;
                info!(count, "Tools refreshed");
                print!("{}", ConsoleFormatter::format_tools(&self.assistant.capabilities()));
            }
            ReplCommand::Agents => {
                print!("{}", ConsoleFormatter::format_presets(self.assistant.presets()));
            }
            ReplCommand::Model(None) => {
                println!("{}", ConsoleFormatter::format_model(&self.assistant.llm_config()));
            }
            ReplCommand::Model(Some(name)) => {
                let config = self.assistant.set_model(&name);
                println!("Switched. {}", ConsoleFormatter::format_model(&config));
            }
            ReplCommand::Exit => {
                println!("Bye!");
                return CommandResult::Exit;
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        CommandResult::Continue
    }
}

/// Read one line on a blocking task. `None` at end of input.
async fn read_line(prompt: &'static str) -> io::Result<Option<String>> {
    let read = tokio::task::spawn_blocking(move || -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{} ", prompt.green().bold())?;
        stdout.flush()?;

        let mut line = String::new();
        let n = io::stdin().lock().read_line(&mut line)?;
        Ok((n > 0).then_some(line))
    })
    .await;
    read.map_err(io::Error::other)?
}
