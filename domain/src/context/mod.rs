//! Project knowledge loaded from well-known files in the working directory
//! (`SHIPWRIGHT.md`, `AGENTS.md`, `CLAUDE.md`, `README.md`, build manifests).

pub mod entities;
pub mod value_objects;

pub use entities::ProjectContext;
pub use value_objects::{KnownContextFile, LoadedContextFile};
