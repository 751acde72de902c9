//! Value objects for project knowledge files

use std::path::Path;

/// Files the context loader looks for in the working directory.
///
/// Lower [`priority`](KnownContextFile::priority) wins when choosing the
/// instruction file; build manifests only contribute the project type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownContextFile {
    /// `SHIPWRIGHT.md`
    ShipwrightMd,
    /// `AGENTS.md`
    AgentsMd,
    /// `CLAUDE.md`
    ClaudeMd,
    /// `README.md`
    ReadmeMd,
    CargoToml,
    PackageJson,
    PyprojectToml,
    GoMod,
}

impl KnownContextFile {
    /// Path relative to the working directory.
    ///
    /// ```
    /// use shipwright_domain::context::KnownContextFile;
    ///
    /// assert_eq!(KnownContextFile::AgentsMd.relative_path(), "AGENTS.md");
    /// ```
    pub fn relative_path(&self) -> &'static str {
        match self {
            KnownContextFile::ShipwrightMd => "SHIPWRIGHT.md",
            KnownContextFile::AgentsMd => "AGENTS.md",
            KnownContextFile::ClaudeMd => "CLAUDE.md",
            KnownContextFile::ReadmeMd => "README.md",
            KnownContextFile::CargoToml => "Cargo.toml",
            KnownContextFile::PackageJson => "package.json",
            KnownContextFile::PyprojectToml => "pyproject.toml",
            KnownContextFile::GoMod => "go.mod",
        }
    }

    pub fn priority(&self) -> u8 {
        match self {
            KnownContextFile::ShipwrightMd => 0,
            KnownContextFile::AgentsMd => 1,
            KnownContextFile::ClaudeMd => 2,
            KnownContextFile::ReadmeMd => 3,
            KnownContextFile::CargoToml
            | KnownContextFile::PackageJson
            | KnownContextFile::PyprojectToml
            | KnownContextFile::GoMod => 4,
        }
    }

    /// Instruction files written for coding assistants.
    pub fn is_instructions(&self) -> bool {
        matches!(
            self,
            KnownContextFile::ShipwrightMd | KnownContextFile::AgentsMd | KnownContextFile::ClaudeMd
        )
    }

    pub fn project_type(&self) -> Option<&'static str> {
        match self {
            KnownContextFile::CargoToml => Some("rust"),
            KnownContextFile::PackageJson => Some("nodejs"),
            KnownContextFile::PyprojectToml => Some("python"),
            KnownContextFile::GoMod => Some("go"),
            _ => None,
        }
    }

    /// All known files in priority order.
    pub fn all() -> &'static [KnownContextFile] {
        &[
            KnownContextFile::ShipwrightMd,
            KnownContextFile::AgentsMd,
            KnownContextFile::ClaudeMd,
            KnownContextFile::ReadmeMd,
            KnownContextFile::CargoToml,
            KnownContextFile::PackageJson,
            KnownContextFile::PyprojectToml,
            KnownContextFile::GoMod,
        ]
    }
}

impl std::fmt::Display for KnownContextFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.relative_path())
    }
}

/// A context file read from disk.
#[derive(Debug, Clone)]
pub struct LoadedContextFile {
    pub file_type: KnownContextFile,
    pub path: String,
    pub content: String,
}

impl LoadedContextFile {
    pub fn new(file_type: KnownContextFile, path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_type,
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn filename(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}
