//! Structured logging for the Sea Lines screenshot tools
//!
//! Installs a `tracing` subscriber writing compact lines to stderr, so log
//! output never mixes with the external tool's stdout or with JSON reports.

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging
///
/// `RUST_LOG` takes precedence over `config.log_level` when set.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.show_target)
            .with_ansi(config.ansi)
            .compact(),
    );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Include the event target (module path) in each line
    pub show_target: bool,
    /// Emit ANSI colour codes
    pub ansi: bool,
}

impl TelemetryConfig {
    /// Configuration for a `-v` count: 0 = warn, 1 = info, 2 = debug, 3+ = trace
    pub fn from_verbosity(verbose: u8) -> Self {
        let log_level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        Self {
            log_level: log_level.to_string(),
            show_target: verbose >= 2,
            ..Self::default()
        }
    }

    /// Toggle ANSI colour output
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            show_target: false,
            ansi: true,
        }
    }
}
