//! Screenshot capture across target platforms
//!
//! A run is one `build`, then `wipe`, `kill`, `install`, `screenshot` per
//! platform in manifest order, then a final `wipe` and `kill`. The first
//! failing invocation aborts the run; screenshots already written stay.

use crate::error::{RebbleError, Result};
use crate::tool::{screenshot_filename, Rebble, ToolCommand};
use chrono::{DateTime, Utc};
use sealines_cli::output::Status;
use sealines_core::manifest::PackageManifest;
use sealines_core::process::CommandRunner;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Ordered tool invocations for a set of platforms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturePlan {
    /// Platforms in capture order
    pub platforms: Vec<String>,
    /// Every invocation, in execution order
    pub commands: Vec<ToolCommand>,
}

impl CapturePlan {
    /// Plan a capture of `platforms`, keeping their order
    pub fn new(platforms: &[String]) -> Self {
        let mut commands = Vec::with_capacity(3 + platforms.len() * PLATFORM_STEPS);
        commands.push(ToolCommand::Build);
        for platform in platforms {
            commands.extend(platform_commands(platform));
        }
        commands.push(ToolCommand::Wipe);
        commands.push(ToolCommand::Kill);

        Self {
            platforms: platforms.to_vec(),
            commands,
        }
    }

    /// Platform whose clean-state capture begins at `commands[index]`
    fn platform_starting_at(&self, index: usize) -> Option<&str> {
        let offset = index.checked_sub(1)?;
        if offset % PLATFORM_STEPS != 0 {
            return None;
        }
        self.platforms.get(offset / PLATFORM_STEPS).map(String::as_str)
    }

    /// Screenshot files the plan will write
    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.platforms
            .iter()
            .map(|p| PathBuf::from(screenshot_filename(p)))
            .collect()
    }
}

const PLATFORM_STEPS: usize = 4;

/// Clean-state capture for one platform
fn platform_commands(platform: &str) -> [ToolCommand; PLATFORM_STEPS] {
    [
        ToolCommand::Wipe,
        ToolCommand::Kill,
        ToolCommand::install(platform),
        ToolCommand::screenshot_for(platform),
    ]
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct CaptureReport {
    /// Platforms captured, in order
    pub platforms: Vec<String>,
    /// Screenshot files written
    pub screenshots: Vec<PathBuf>,
    /// Number of tool invocations executed
    pub commands_run: usize,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the run
    #[serde(with = "duration_ms")]
    pub duration: Duration,
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

/// Narrow the manifest's platforms to `requested`, keeping manifest order
///
/// An empty request selects every platform. Requesting a platform the
/// manifest does not target is an error.
pub fn select_platforms(available: &[String], requested: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(available.to_vec());
    }

    if let Some(unknown) = requested.iter().find(|r| !available.contains(*r)) {
        return Err(RebbleError::UnknownPlatform {
            platform: unknown.clone(),
            available: available.to_vec(),
        });
    }

    Ok(available
        .iter()
        .filter(|p| requested.contains(*p))
        .cloned()
        .collect())
}

/// Execute a full capture of `platforms`
pub fn capture_screenshots<R: CommandRunner>(
    rebble: &mut Rebble<R>,
    platforms: &[String],
) -> Result<CaptureReport> {
    let started_at = Utc::now();
    let start = Instant::now();
    let plan = CapturePlan::new(platforms);
    let total = plan.platforms.len();
    let mut commands_run = 0;

    for (index, command) in plan.commands.iter().enumerate() {
        if *command == ToolCommand::Build {
            info!(platforms = ?plan.platforms, "building watch app");
            Status::info(&format!("Building with {}", rebble.command_line(command)));
        }
        if let Some(platform) = plan.platform_starting_at(index) {
            let position = (index - 1) / PLATFORM_STEPS + 1;
            Status::step(position, total, &format!("Capturing {}", platform));
            info!(%platform, "capturing screenshot");
        }

        rebble.run(command)?;
        commands_run += 1;
    }

    let report = CaptureReport {
        platforms: plan.platforms.clone(),
        screenshots: plan.screenshots(),
        commands_run,
        started_at,
        duration: start.elapsed(),
    };
    info!(
        screenshots = report.screenshots.len(),
        duration_ms = report.duration.as_millis() as u64,
        "capture finished"
    );
    Ok(report)
}

/// Load the manifest, select platforms and run the capture
///
/// Manifest and selection errors surface before the tool is invoked.
pub fn capture_from_manifest<R: CommandRunner>(
    rebble: &mut Rebble<R>,
    manifest_path: &Path,
    requested: &[String],
) -> Result<CaptureReport> {
    let manifest = PackageManifest::load(manifest_path)?;
    let platforms = select_platforms(manifest.target_platforms(), requested)?;

    info!(
        manifest = %manifest_path.display(),
        app = %manifest.label(),
        "loaded project manifest"
    );
    capture_screenshots(rebble, &platforms)
}
