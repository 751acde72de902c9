//! Aggregated project knowledge
//!
//! Built once at startup and shared read-only (`Arc<ProjectContext>`)
//! between the main agent and every sub-agent.

use super::value_objects::{KnownContextFile, LoadedContextFile};
use crate::core::string::truncate;

const INSTRUCTIONS_LIMIT: usize = 8000;
const README_LIMIT: usize = 2000;

/// Project knowledge appended to every agent's system payload.
///
/// ```
/// use shipwright_domain::context::{KnownContextFile, LoadedContextFile, ProjectContext};
///
/// let ctx = ProjectContext::from_files(vec![
///     LoadedContextFile::new(KnownContextFile::AgentsMd, "/p/AGENTS.md", "Run `make check`."),
///     LoadedContextFile::new(KnownContextFile::CargoToml, "/p/Cargo.toml", "[package]"),
/// ]);
/// assert_eq!(ctx.project_type.as_deref(), Some("rust"));
/// assert!(ctx.render().unwrap().contains("make check"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    /// Content of the highest-priority instruction file
    pub instructions: Option<String>,
    pub instructions_source: Option<KnownContextFile>,
    pub readme: Option<String>,
    pub project_type: Option<String>,
}

impl ProjectContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_files(mut files: Vec<LoadedContextFile>) -> Self {
        files.sort_by_key(|f| f.file_type.priority());

        let mut ctx = Self::new();
        for file in files {
            if file.file_type.is_instructions() && ctx.instructions.is_none() {
                ctx.instructions = Some(file.content);
                ctx.instructions_source = Some(file.file_type);
            } else if file.file_type == KnownContextFile::ReadmeMd && ctx.readme.is_none() {
                ctx.readme = Some(file.content);
            } else if let Some(pt) = file.file_type.project_type()
                && ctx.project_type.is_none()
            {
                ctx.project_type = Some(pt.to_string());
            }
        }
        ctx
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_none() && self.readme.is_none() && self.project_type.is_none()
    }

    /// Instruction file name for logging, or "none".
    pub fn source_description(&self) -> String {
        self.instructions_source
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string())
    }

    /// Text for the system channel, or `None` when nothing was loaded.
    pub fn render(&self) -> Option<String> {
        let mut parts = Vec::new();

        if let Some(pt) = &self.project_type {
            parts.push(format!("Project type: {}", pt));
        }
        if let (Some(text), Some(source)) = (&self.instructions, self.instructions_source) {
            parts.push(format!(
                "Project instructions ({}):\n{}",
                source,
                truncate(text, INSTRUCTIONS_LIMIT)
            ));
        }
        if let Some(readme) = &self.readme {
            parts.push(format!("README:\n{}", truncate(readme, README_LIMIT)));
        }

        (!parts.is_empty()).then(|| format!("# Project knowledge\n\n{}", parts.join("\n\n")))
    }
}
