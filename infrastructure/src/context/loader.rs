//! Local file system context loader
//!
//! Reads the well-known project files from the working directory and builds
//! the immutable [`ProjectContext`] snapshot shared by every agent.

use shipwright_domain::{KnownContextFile, LoadedContextFile, ProjectContext};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct LocalContextLoader;

impl LocalContextLoader {
    pub fn new() -> Self {
        Self
    }

    fn load_single_file(&self, file_type: KnownContextFile, path: &Path) -> Option<LoadedContextFile> {
        if !path.is_file() {
            return None;
        }
        match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => {
                debug!(path = %path.display(), "Skipping empty context file");
                None
            }
            Ok(content) => {
                debug!(path = %path.display(), "Loaded context file");
                Some(LoadedContextFile::new(file_type, path.to_string_lossy(), content))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read context file");
                None
            }
        }
    }

    /// Every known file present in `project_root`, in priority order.
    pub fn load_known_files(&self, project_root: &Path) -> Vec<LoadedContextFile> {
        KnownContextFile::all()
            .iter()
            .filter_map(|file_type| {
                self.load_single_file(*file_type, &project_root.join(file_type.relative_path()))
            })
            .collect()
    }

    pub fn load(&self, project_root: &Path) -> ProjectContext {
        let context = ProjectContext::from_files(self.load_known_files(project_root));
        debug!(source = %context.source_description(), "Project context loaded");
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_instruction_file_priority() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CLAUDE.md"), "claude rules").unwrap();
        fs::write(dir.path().join("AGENTS.md"), "agent rules").unwrap();
        fs::write(dir.path().join("README.md"), "# Demo").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();

        let context = LocalContextLoader::new().load(dir.path());

        assert_eq!(context.instructions.as_deref(), Some("agent rules"));
        assert_eq!(context.project_type.as_deref(), Some("rust"));
        let rendered = context.render().unwrap();
        assert!(rendered.contains("Project instructions (AGENTS.md)"));
        assert!(rendered.contains("README:\n# Demo"));
    }

    #[test]
    fn test_empty_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("SHIPWRIGHT.md"), "  \n").unwrap();

        let loader = LocalContextLoader::new();
        assert!(loader.load_known_files(dir.path()).is_empty());
        assert!(loader.load(dir.path()).is_empty());
    }
}
