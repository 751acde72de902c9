//! Agent loop
//!
//! Drives one conversation through repeated model-call / tool-dispatch
//! rounds until the model stops asking for tools or the iteration cap is
//! hit:
//!
//! ```text
//! Idle → CallingModel → DispatchingTools → CallingModel → … → Terminated
//! ```
//!
//! Tool calls of one round run sequentially, in model order, and their
//! results are folded into a single tool message.

mod types;

pub use types::{AgentOutcome, AgentRuntime, RunAgentError};

use shipwright_domain::{AgentConfig, AgentState, LoopPhase, Message, ToolResultRecord};
use tracing::{debug, info, warn};

use crate::ports::llm_client::LlmRequest;

/// One agent: its config, its private history, and the shared runtime.
pub struct Agent {
    state: AgentState,
    phase: LoopPhase,
    runtime: AgentRuntime,
}

impl Agent {
    pub fn new(config: AgentConfig, runtime: AgentRuntime) -> Self {
        let id = format!("{}-{}", config.agent_type, uuid::Uuid::new_v4());
        Self {
            state: AgentState::new(id, config),
            phase: LoopPhase::Idle,
            runtime,
        }
    }

    pub fn id(&self) -> &str {
        &self.state.id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.state.config
    }

    pub fn add_message(&mut self, message: Message) {
        self.state.messages.push(message);
    }

    pub fn clear_messages(&mut self) {
        self.state.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Run one user turn to completion.
    ///
    /// A provider error aborts the turn and rolls history back to where it
    /// was before `user_input` was added.
    pub async fn run(&mut self, user_input: &str) -> Result<AgentOutcome, RunAgentError> {
        if self.state.is_running {
            return Err(RunAgentError::AlreadyRunning);
        }

        self.state.is_running = true;
        let checkpoint = self.state.messages.len();
        let result = self.run_loop(user_input).await;
        self.state.is_running = false;
        self.set_phase(LoopPhase::Terminated);

        if let Err(e) = &result {
            warn!(agent = %self.state.id, error = %e, "Agent run aborted");
            self.state.messages.truncate(checkpoint);
        }
        result
    }

    async fn run_loop(&mut self, user_input: &str) -> Result<AgentOutcome, RunAgentError> {
        self.state.messages.push(Message::user(user_input));

        let max_loops = self.state.config.effective_max_loops();
        let system = self.system_payload();
        info!(agent = %self.state.id, max_loops, "Agent run started");

        for iteration in 1..=max_loops {
            self.set_phase(LoopPhase::CallingModel);
            let progress = self.runtime.progress.clone();
            progress.on_model_call_start(&self.state.config.name, iteration);

            let request = LlmRequest::new(self.state.messages.clone())
                .with_system(system.clone())
                .with_tools(
                    self.runtime
                        .guard
                        .offered_tools(&self.state.config.available_tools),
                );
            let response = self.runtime.llm.complete(&request).await?;

            let calls = response.tool_calls();
            progress.on_model_call_end(&self.state.config.name, calls.len());
            debug!(
                agent = %self.state.id,
                iteration,
                stop_reason = %response.stop_reason,
                tool_calls = calls.len(),
                "Model turn complete"
            );
            self.state.messages.push(response.to_message());

            if calls.is_empty() {
                info!(agent = %self.state.id, iterations = iteration, "Agent run finished");
                return Ok(AgentOutcome {
                    text: response.text_content(),
                    iterations: iteration,
                    loop_limit_reached: false,
                });
            }

            self.set_phase(LoopPhase::DispatchingTools);
            let mut records = Vec::with_capacity(calls.len());
            for call in &calls {
                progress.on_tool_call(call);
                let result = self
                    .runtime
                    .guard
                    .execute(call, &self.state.config.available_tools, &self.runtime.context)
                    .await;
                progress.on_tool_result(call, &result);
                records.push(ToolResultRecord::new(call, result));
            }
            self.state.messages.push(Message::tool_results(records));
        }

        warn!(agent = %self.state.id, max_loops, "Loop limit reached");
        self.runtime
            .progress
            .on_loop_limit(&self.state.config.name, max_loops);
        Ok(AgentOutcome {
            text: self.state.last_assistant_text().to_string(),
            iterations: max_loops,
            loop_limit_reached: true,
        })
    }

    /// System prompt plus project knowledge, as one payload.
    fn system_payload(&self) -> String {
        match self.runtime.project.render() {
            Some(knowledge) => format!("{}\n\n{}", self.state.config.system_prompt, knowledge),
            None => self.state.config.system_prompt.clone(),
        }
    }

    fn set_phase(&mut self, phase: LoopPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.runtime
                .progress
                .on_phase_change(&self.state.config.name, phase);
        }
    }
}
