//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigSchema {
    /// `[tool]` table
    #[serde(default)]
    pub tool: ToolConfig,

    /// `[project]` table
    #[serde(default)]
    pub project: ProjectConfig,
}

/// External watch-app tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Executable name or path of the tool
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_program() -> String {
    "rebble".to_string()
}

/// Watchface project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Path of the project manifest listing the target platforms
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
        }
    }
}

fn default_manifest() -> String {
    "package.json".to_string()
}
