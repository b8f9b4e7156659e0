//! Sea Lines screenshot CLI
//!
//! Builds the watchface and captures one emulator screenshot per target
//! platform listed in `package.json`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sealines_cli::output::{format_count, format_duration, Status};
use sealines_core::config::Config;
use sealines_core::error::exit_codes;
use sealines_core::health::{CommandCheck, HealthChecker, HealthStatus, ManifestCheck};
use sealines_core::manifest::PackageManifest;
use sealines_core::process::ProcessRunner;
use sealines_rebble::{capture_from_manifest, select_platforms, CapturePlan, Rebble, RebbleError};
use sealines_telemetry::TelemetryConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sealines-screenshots")]
#[command(about = "Capture Sea Lines screenshots on every Pebble emulator platform")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project manifest listing the target platforms
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Watch-app tool executable
    #[arg(long, global = true)]
    tool: Option<String>,

    /// Only capture these platforms (repeatable)
    #[arg(short, long = "platform", global = true)]
    platforms: Vec<String>,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, install and screenshot every platform (default)
    Run,

    /// Print the tool invocations a run would make
    Plan {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the tool and manifest
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Effective settings after merging the config file and flags
struct Settings {
    program: String,
    manifest: PathBuf,
    platforms: Vec<String>,
}

impl Settings {
    fn resolve(cli: &Cli) -> sealines_core::Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        if let Some(path) = &config.path {
            tracing::debug!(config = %path.display(), "loaded configuration");
        }

        Ok(Self {
            program: cli
                .tool
                .clone()
                .unwrap_or_else(|| config.schema.tool.program.clone()),
            manifest: cli
                .manifest
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.schema.project.manifest)),
            platforms: cli.platforms.clone(),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }
    Status::set_quiet(cli.quiet);

    sealines_telemetry::init_with_config(
        TelemetryConfig::from_verbosity(cli.verbose).with_ansi(!cli.no_color),
    )?;

    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            Status::error(&e.to_string());
            std::process::exit(e.exit_code());
        }
    };

    let exit_code = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_capture(&settings),
        Commands::Plan { json } => run_plan(&settings, json),
        Commands::Doctor { json } => run_doctor(&settings, json),
    };

    std::process::exit(exit_code);
}

fn run_capture(settings: &Settings) -> i32 {
    let mut rebble = Rebble::new(&settings.program, ProcessRunner);

    match capture_from_manifest(&mut rebble, &settings.manifest, &settings.platforms) {
        Ok(report) => {
            Status::success(&format!(
                "Captured {} in {}",
                format_count(report.screenshots.len(), "screenshot", "screenshots"),
                format_duration(report.duration)
            ));
            for screenshot in &report.screenshots {
                Status::info(&screenshot.display().to_string());
            }
            exit_codes::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_plan(settings: &Settings, json: bool) -> i32 {
    let plan = match load_plan(settings) {
        Ok(plan) => plan,
        Err(e) => return fail(&e),
    };

    if json {
        let commands: Vec<Vec<&str>> = plan.commands.iter().map(|c| c.args()).collect();
        let output = serde_json::json!({
            "program": settings.program,
            "platforms": plan.platforms,
            "commands": commands,
            "screenshots": plan.screenshots(),
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                Status::error(&format!("Failed to serialize plan: {}", e));
                return exit_codes::FAILURE;
            }
        }
    } else {
        for command in &plan.commands {
            println!("{} {}", settings.program, command);
        }
    }

    exit_codes::SUCCESS
}

fn load_plan(settings: &Settings) -> sealines_rebble::Result<CapturePlan> {
    let manifest = PackageManifest::load(&settings.manifest)?;
    let platforms = select_platforms(manifest.target_platforms(), &settings.platforms)?;
    Ok(CapturePlan::new(&platforms))
}

fn run_doctor(settings: &Settings, json: bool) -> i32 {
    let report = HealthChecker::new()
        .add_check(CommandCheck::new(&settings.program, Some("--version")))
        .add_check(ManifestCheck::new(&settings.manifest))
        .run();

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                Status::error(&format!("Failed to serialize report: {}", e));
                return exit_codes::FAILURE;
            }
        }
    } else {
        Status::header("Environment Check");
        for check in &report.checks {
            let mut line = check.name.clone();
            if let Some(message) = &check.message {
                line.push_str(&format!(": {}", message));
            }
            for (key, value) in &check.details {
                line.push_str(&format!("\n    {}: {}", key, value));
            }
            match check.status {
                HealthStatus::Healthy => Status::success(&line),
                HealthStatus::Degraded => Status::warning(&line),
                HealthStatus::Unhealthy => Status::error(&line),
            }
        }
    }

    if report.status == HealthStatus::Unhealthy {
        exit_codes::FAILURE
    } else {
        exit_codes::SUCCESS
    }
}

fn fail(err: &RebbleError) -> i32 {
    Status::error(&err.to_string());
    err.exit_code()
}
