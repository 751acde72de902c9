//! Configuration file loader with multi-source merging

use super::error::ConfigError;
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

const PROJECT_CONFIG_FILES: [&str; 2] = ["shipwright.toml", ".shipwright.toml"];
const ENV_PREFIX: &str = "SHIPWRIGHT_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. `SHIPWRIGHT_*` environment variables (`SHIPWRIGHT_LLM__MODEL=...`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `shipwright.toml` or `.shipwright.toml`
    /// 4. Global: `<config_dir>/shipwright/config.toml`
    /// 5. Default values
    pub fn load(explicit: Option<&Path>, working_dir: &Path) -> Result<FileConfig, ConfigError> {
        let global = Self::global_config_path();
        Self::load_from(global.as_deref(), working_dir, explicit)
    }

    /// [`load`](Self::load) with the global path supplied by the caller.
    pub fn load_from(
        global: Option<&Path>,
        working_dir: &Path,
        explicit: Option<&Path>,
    ) -> Result<FileConfig, ConfigError> {
        if let Some(path) = explicit
            && !path.is_file()
        {
            return Err(ConfigError::MissingFile(path.display().to_string()));
        }

        let config: FileConfig = Self::figment(global, working_dir, explicit)
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    fn figment(global: Option<&Path>, working_dir: &Path, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!(path = %global_path.display(), "Merging global config");
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = Self::project_config_path(working_dir) {
            debug!(path = %project_path.display(), "Merging project config");
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = explicit {
            debug!(path = %path.display(), "Merging explicit config");
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `<config_dir>/shipwright/config.toml`
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("shipwright").join("config.toml"))
    }

    /// First project-level config file present in `working_dir`
    pub fn project_config_path(working_dir: &Path) -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(|name| working_dir.join(name))
            .find(|path| path.exists())
    }
}
