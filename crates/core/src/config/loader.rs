//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Candidate file names, checked in order
const CONFIG_CANDIDATES: [&str; 3] = [".sealines.toml", "sealines.toml", ".config/sealines.toml"];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings (defaults when no file was found)
    pub schema: ConfigSchema,
    /// File the settings came from
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, a discovered file, or defaults.
    ///
    /// An explicit path must exist; discovery silently falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, Path::new("."))
    }

    /// Like [`Config::load`], discovering candidates relative to `base`
    pub fn load_from(path: Option<&Path>, base: &Path) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(base),
        };

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file(base: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|candidate| candidate.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path.display(), e)))?;

    let schema: ConfigSchema = toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("While parsing {}", path.display()))?;

    if schema.tool.program.trim().is_empty() {
        return Err(Error::config("tool.program must not be empty")
            .with_context(format!("While parsing {}", path.display())));
    }

    Ok(schema)
}
