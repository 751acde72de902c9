//! Sub-agent manager
//!
//! Runs a specialized preset agent for a single task. The sub-agent gets a
//! fresh history, the shared runtime (registry, gate, LLM client, project
//! snapshot), and is dropped as soon as it returns. Only its final text
//! crosses back to the caller.

use shipwright_domain::agent::{PRESETS, SubAgentPreset};
use tracing::info;

use super::run_agent::{Agent, AgentOutcome, AgentRuntime, RunAgentError};

pub struct SubAgentManager {
    runtime: AgentRuntime,
}

impl SubAgentManager {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }

    pub fn presets(&self) -> &'static [SubAgentPreset] {
        &PRESETS
    }

    pub async fn run(
        &self,
        preset: &SubAgentPreset,
        task: &str,
    ) -> Result<AgentOutcome, RunAgentError> {
        let progress = self.runtime.progress.clone();
        progress.on_sub_agent_start(preset.token, task);

        let mut agent = Agent::new(preset.to_config(), self.runtime.clone());
        info!(agent = %agent.id(), preset = preset.token, "Sub-agent spawned");
        let outcome = agent.run(task).await;
        info!(agent = %agent.id(), "Sub-agent torn down");
        drop(agent);

        progress.on_sub_agent_end(preset.token);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::*;
    use serde_json::json;
    use shipwright_domain::LlmResponse;
    use shipwright_domain::agent::find_preset;
    use shipwright_domain::tool::codes;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_review_preset_offers_read_only_tools() {
        let llm = Arc::new(ScriptedLlm::new(vec![Ok(LlmResponse::from_text("LGTM"))]));
        let registry = Arc::new(FakeRegistry::new());
        let manager = SubAgentManager::new(runtime(llm.clone(), registry));

        let outcome = manager
            .run(find_preset("review").unwrap(), "review src/lib.rs")
            .await
            .unwrap();

        assert_eq!(outcome.text, "LGTM");
        let request = llm.request(0);
        let names: Vec<_> = request.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["read_file", "list_files"]);
        assert!(request.system.unwrap().contains("code reviewer"));
        assert_eq!(request.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_sub_agent_cannot_use_tools_outside_preset() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok(tool_response(
                "",
                vec![tool_use("c1", "write_file", json!({"path": "a.rs", "content": ""}))],
            )),
            Ok(LlmResponse::from_text("Could not write.")),
        ]));
        let registry = Arc::new(FakeRegistry::new());
        let manager = SubAgentManager::new(runtime(llm.clone(), registry.clone()));

        manager
            .run(find_preset("review").unwrap(), "fix it")
            .await
            .unwrap();

        assert!(registry.dispatched_names().is_empty());
        let record = &llm.request(1).messages[2].tool_results[0];
        assert_eq!(record.result.error().unwrap().code, codes::PERMISSION_DENIED);
    }

    #[tokio::test]
    async fn test_preset_loop_cap_applies() {
        let llm = Arc::new(ScriptedLlm::repeating(tool_response(
            "still reading",
            vec![tool_use("c1", "read_file", json!({"path": "x"}))],
        )));
        let registry = Arc::new(FakeRegistry::new());
        let manager = SubAgentManager::new(runtime(llm.clone(), registry));

        let outcome = manager
            .run(find_preset("review").unwrap(), "read everything")
            .await
            .unwrap();

        assert!(outcome.loop_limit_reached);
        assert_eq!(llm.call_count(), 8);
        assert_eq!(outcome.text, "still reading");
    }
}
