//! Health checks for the screenshot environment
//!
//! Verifies that the external watch-app tool is installed and that the
//! project manifest can be read before a long capture run starts.

use crate::manifest::PackageManifest;
use crate::process::{command_exists, run_command, which_command};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All checks passed
    Healthy,
    /// Some optional checks failed
    Degraded,
    /// Required checks failed
    Unhealthy,
}

impl HealthStatus {
    /// Returns true if status is healthy
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Individual health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,
    /// Status of the check
    pub status: HealthStatus,
    /// Optional message with details
    pub message: Option<String>,
    /// Duration of the check in milliseconds
    pub duration_ms: u64,
    /// Additional details as key-value pairs
    pub details: BTreeMap<String, String>,
}

impl CheckResult {
    /// Create a healthy check result
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Healthy,
            message: None,
            duration_ms: 0,
            details: BTreeMap::new(),
        }
    }

    /// Create an unhealthy check result with a message
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            duration_ms: 0,
            details: BTreeMap::new(),
        }
    }

    /// Create a degraded check result with a message
    pub fn degraded(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Degraded,
            message: Some(message.into()),
            duration_ms: 0,
            details: BTreeMap::new(),
        }
    }

    /// Add a detail key-value pair
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Overall health report containing all check results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status based on all checks
    pub status: HealthStatus,
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Total duration of all checks in milliseconds
    pub total_duration_ms: u64,
    /// Timestamp when the report was generated
    pub timestamp: String,
    /// Version of the tool
    pub version: String,
}

impl HealthReport {
    /// Create a new health report from check results
    #[must_use]
    pub fn new(checks: Vec<CheckResult>, duration: Duration) -> Self {
        let status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Degraded
        };

        Self {
            status,
            checks,
            total_duration_ms: duration.as_millis() as u64,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Returns true if overall status is healthy
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }
}

/// Trait for implementing health checks
pub trait HealthCheck {
    /// Perform the health check and return a result
    fn check(&self) -> CheckResult;
}

/// Health checker with configurable checks
#[derive(Default)]
pub struct HealthChecker {
    checks: Vec<Box<dyn HealthCheck>>,
}

impl HealthChecker {
    /// Create a new health checker with no checks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a health check
    #[must_use]
    pub fn add_check(mut self, check: impl HealthCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Run all health checks
    #[must_use]
    pub fn run(&self) -> HealthReport {
        let start = Instant::now();
        let mut results = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            let check_start = Instant::now();
            let mut result = check.check();
            result.duration_ms = check_start.elapsed().as_millis() as u64;
            results.push(result);
        }

        HealthReport::new(results, start.elapsed())
    }
}

/// Check that a command is available, recording its path and version
pub struct CommandCheck {
    command: String,
    version_arg: Option<String>,
}

impl CommandCheck {
    /// Create a required command check
    pub fn new(command: impl Into<String>, version_arg: Option<&str>) -> Self {
        Self {
            command: command.into(),
            version_arg: version_arg.map(String::from),
        }
    }
}

impl HealthCheck for CommandCheck {
    fn check(&self) -> CheckResult {
        if !command_exists(&self.command) {
            return CheckResult::unhealthy(&self.command, format!("{} is not installed", self.command));
        }

        let mut result = CheckResult::healthy(&self.command);
        if let Some(path) = which_command(&self.command) {
            result = result.with_detail("path", path.display().to_string());
        }

        // A tool that is present but cannot report its version still counts as installed.
        if let Some(arg) = &self.version_arg {
            if let Ok(output) = run_command(&self.command, &[arg.as_str()]) {
                if output.success {
                    let version = output.stdout.lines().next().unwrap_or("").trim().to_string();
                    if !version.is_empty() {
                        result = result.with_detail("version", version);
                    }
                }
            }
        }

        result
    }
}

/// Check that the project manifest loads and lists platforms
pub struct ManifestCheck {
    path: PathBuf,
}

impl ManifestCheck {
    /// Check the manifest at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HealthCheck for ManifestCheck {
    fn check(&self) -> CheckResult {
        match PackageManifest::load(&self.path) {
            Ok(manifest) if manifest.target_platforms().is_empty() => {
                CheckResult::degraded("manifest", "pebble.targetPlatforms is empty")
                    .with_detail("path", self.path.display().to_string())
            }
            Ok(manifest) => CheckResult::healthy("manifest")
                .with_detail("path", self.path.display().to_string())
                .with_detail("platforms", manifest.target_platforms().join(", ")),
            Err(e) => CheckResult::unhealthy("manifest", e.message)
                .with_detail("path", self.path.display().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_report_status_aggregation() {
        let healthy = HealthReport::new(vec![CheckResult::healthy("a")], Duration::ZERO);
        assert_eq!(healthy.status, HealthStatus::Healthy);

        let degraded = HealthReport::new(
            vec![CheckResult::healthy("a"), CheckResult::degraded("b", "meh")],
            Duration::ZERO,
        );
        assert_eq!(degraded.status, HealthStatus::Degraded);

        let unhealthy = HealthReport::new(
            vec![CheckResult::degraded("b", "meh"), CheckResult::unhealthy("c", "bad")],
            Duration::ZERO,
        );
        assert_eq!(unhealthy.status, HealthStatus::Unhealthy);
        assert!(!unhealthy.is_healthy());
    }

    #[test]
    fn test_command_check_missing() {
        let result = CommandCheck::new("nonexistent_command_12345", Some("--version")).check();
        assert_eq!(result.status, HealthStatus::Unhealthy);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_check_present() {
        let result = CommandCheck::new("sh", None).check();
        assert_eq!(result.status, HealthStatus::Healthy);
        assert!(result.details.contains_key("path"));
    }

    #[test]
    fn test_manifest_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");

        let missing = ManifestCheck::new(&path).check();
        assert_eq!(missing.status, HealthStatus::Unhealthy);

        fs::write(&path, r#"{"pebble": {"targetPlatforms": []}}"#).unwrap();
        let empty = ManifestCheck::new(&path).check();
        assert_eq!(empty.status, HealthStatus::Degraded);

        fs::write(&path, r#"{"pebble": {"targetPlatforms": ["basalt", "chalk"]}}"#).unwrap();
        let ok = ManifestCheck::new(&path).check();
        assert_eq!(ok.status, HealthStatus::Healthy);
        assert_eq!(ok.details["platforms"], "basalt, chalk");
    }

    #[test]
    fn test_checker_runs_all_checks() {
        let dir = tempfile::tempdir().unwrap();
        let report = HealthChecker::new()
            .add_check(CommandCheck::new("nonexistent_command_12345", None))
            .add_check(ManifestCheck::new(dir.path().join("package.json")))
            .run();

        assert_eq!(report.checks.len(), 2);
        assert_eq!(report.status, HealthStatus::Unhealthy);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"unhealthy\""));
    }
}
