//! Watchface project manifest (`package.json`)
//!
//! Only the fields the screenshot tools need are modelled; everything else
//! in the manifest is ignored.

use crate::error::{Error, ErrorCode, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parsed project manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Package name
    #[serde(default)]
    pub name: Option<String>,

    /// Package version
    #[serde(default)]
    pub version: Option<String>,

    /// Pebble-specific section
    pub pebble: PebbleSection,
}

/// The `pebble` section of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PebbleSection {
    /// Name shown on the watch
    #[serde(default)]
    pub display_name: Option<String>,

    /// Emulator platforms the app is built for, in manifest order
    pub target_platforms: Vec<String>,
}

impl PackageManifest {
    /// Read and parse the manifest at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::manifest_not_found(path));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorCode::ManifestError,
                format!("Failed to read manifest {}: {}", path.display(), e),
            )
            .with_source(e)
        })?;

        Self::parse(&content).context(format!("While reading {}", path.display()))
    }

    /// Parse manifest JSON
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(content)?;

        // Stricter than the manifest format: a blank id would name `screenshot_.png`.
        if let Some(blank) = manifest.pebble.target_platforms.iter().find(|p| p.trim().is_empty()) {
            return Err(Error::manifest(format!(
                "sealines-screenshots does not accept blank platform names ({:?} in pebble.targetPlatforms)",
                blank
            ))
            .with_suggestion("Remove the blank entry from pebble.targetPlatforms"));
        }

        Ok(manifest)
    }

    /// Target platforms in manifest order
    pub fn target_platforms(&self) -> &[String] {
        &self.pebble.target_platforms
    }

    /// Best human-readable name for status lines
    pub fn label(&self) -> String {
        let name = self
            .pebble
            .display_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("watchface");
        match &self.version {
            Some(version) => format!("{} {}", name, version),
            None => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SEA_LINES: &str = r#"{
        "name": "sea-lines",
        "author": "someone",
        "version": "1.2.0",
        "keywords": ["pebble-app"],
        "private": true,
        "dependencies": {},
        "pebble": {
            "displayName": "Sea Lines",
            "uuid": "5b3f7c2e-0000-4000-8000-000000000000",
            "sdkVersion": "3",
            "enableMultiJS": true,
            "targetPlatforms": ["aplite", "basalt", "chalk", "diorite", "emery"],
            "watchapp": { "watchface": true },
            "messageKeys": ["BG1", "BG2", "DATE1", "DATE2", "DIGITS", "HOUR", "MIN"],
            "resources": { "media": [] }
        }
    }"#;

    #[test]
    fn test_parse_keeps_platform_order() {
        let manifest = PackageManifest::parse(SEA_LINES).unwrap();
        assert_eq!(
            manifest.target_platforms(),
            ["aplite", "basalt", "chalk", "diorite", "emery"]
        );
        assert_eq!(manifest.label(), "Sea Lines 1.2.0");
    }

    #[test]
    fn test_parse_empty_platform_list() {
        let manifest = PackageManifest::parse(r#"{"pebble": {"targetPlatforms": []}}"#).unwrap();
        assert!(manifest.target_platforms().is_empty());
        assert_eq!(manifest.label(), "watchface");
    }

    #[test]
    fn test_parse_missing_target_platforms() {
        let err = PackageManifest::parse(r#"{"pebble": {"displayName": "x"}}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::ManifestParseError);
        assert!(err.message.contains("targetPlatforms"));
    }

    #[test]
    fn test_parse_missing_pebble_section() {
        let err = PackageManifest::parse(r#"{"name": "sea-lines"}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::ManifestParseError);
    }

    #[test]
    fn test_parse_wrong_platform_type() {
        let err = PackageManifest::parse(r#"{"pebble": {"targetPlatforms": "basalt"}}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::ManifestParseError);
    }

    #[test]
    fn test_parse_blank_platform() {
        let err = PackageManifest::parse(r#"{"pebble": {"targetPlatforms": ["basalt", ""]}}"#)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ManifestError);
        assert!(err.message.starts_with("sealines-screenshots does not accept blank platform names"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = PackageManifest::parse("{ not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::ManifestParseError);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, SEA_LINES).unwrap();

        let manifest = PackageManifest::load(&path).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("sea-lines"));
        assert_eq!(manifest.target_platforms().len(), 5);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PackageManifest::load(dir.path().join("package.json")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ManifestNotFound);
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_load_adds_path_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "[]").unwrap();

        let err = PackageManifest::load(&path).unwrap_err();
        assert!(err.context.unwrap().contains("package.json"));
    }
}
