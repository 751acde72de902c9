//! Capability-server registry (`mcp.json`).
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "github": {
//!       "command": "npx",
//!       "args": ["-y", "@modelcontextprotocol/server-github"],
//!       "env": { "GITHUB_TOKEN": "${GITHUB_TOKEN}" },
//!       "timeoutSecs": 30
//!     }
//!   }
//! }
//! ```
//!
//! The project document is merged over the global one; a project entry
//! replaces a global entry of the same name.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::McpError;

pub const MCP_REGISTRY_FILE: &str = "mcp.json";

static ENV_REFERENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").ok());

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpServerConfig {
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub disabled: bool,
    /// Bound in seconds for the handshake and `tools/list`
    #[serde(rename = "timeoutSecs", skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpRegistryDocument {
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: BTreeMap<String, McpServerConfig>,
}

impl McpRegistryDocument {
    /// Read a registry document. A missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self, McpError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|e| McpError::Registry {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Entries of `overlay` replace same-named entries of `self`.
    pub fn merged_with(mut self, overlay: McpRegistryDocument) -> Self {
        self.mcp_servers.extend(overlay.mcp_servers);
        self
    }

    /// Enabled servers in name order, with `${VAR}` references expanded.
    pub fn enabled_servers(&self) -> Vec<(String, McpServerConfig)> {
        self.mcp_servers
            .iter()
            .filter(|(name, config)| {
                if config.disabled {
                    debug!(server = %name, "MCP server disabled, skipping");
                }
                !config.disabled
            })
            .map(|(name, config)| (name.clone(), config.expanded()))
            .collect()
    }
}

impl McpServerConfig {
    /// Copy with `${VAR}` substituted in `args` and `env` values.
    pub fn expanded(&self) -> Self {
        Self {
            command: self.command.clone(),
            args: self.args.iter().map(|a| substitute_env(a)).collect(),
            env: self
                .env
                .iter()
                .map(|(k, v)| (k.clone(), substitute_env(v)))
                .collect(),
            disabled: self.disabled,
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Replace `${VAR}` with the process environment value. Unset variables
/// become the empty string.
pub fn substitute_env(value: &str) -> String {
    let Some(reference) = ENV_REFERENCE.as_ref() else {
        return value.to_string();
    };
    reference
        .replace_all(value, |caps: &Captures| {
            let name = &caps[1];
            std::env::var(name).unwrap_or_else(|_| {
                warn!(variable = name, "Environment variable referenced by mcp.json is not set");
                String::new()
            })
        })
        .into_owned()
}

/// `<config_dir>/shipwright/mcp.json`
pub fn global_registry_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shipwright").join(MCP_REGISTRY_FILE))
}

/// `<working_dir>/.shipwright/mcp.json`
pub fn project_registry_path(working_dir: &Path) -> PathBuf {
    working_dir.join(".shipwright").join(MCP_REGISTRY_FILE)
}

/// Global registry with the project registry merged over it.
///
/// An unreadable document is logged and treated as empty.
pub fn load_registry(global: Option<&Path>, project: &Path) -> McpRegistryDocument {
    let read = |path: &Path| {
        McpRegistryDocument::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring MCP registry");
            McpRegistryDocument::default()
        })
    };
    let base = global.map(read).unwrap_or_default();
    base.merged_with(read(project))
}
