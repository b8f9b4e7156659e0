//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output. Colour follows the
//! stream it is written to and `owo_colors::set_override`.

use owo_colors::{OwoColorize, Stream};
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);

/// Status message helpers
pub struct Status;

impl Status {
    /// Suppress everything except errors and warnings
    pub fn set_quiet(quiet: bool) {
        QUIET.store(quiet, Ordering::Relaxed);
    }

    fn quiet() -> bool {
        QUIET.load(Ordering::Relaxed)
    }

    /// Print a success message
    pub fn success(message: &str) {
        if !Self::quiet() {
            println!("{} {}", "✓".if_supports_color(Stream::Stdout, |t| t.green()), message);
        }
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".if_supports_color(Stream::Stderr, |t| t.red()), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".if_supports_color(Stream::Stderr, |t| t.yellow()), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        if !Self::quiet() {
            println!("{} {}", "ℹ".if_supports_color(Stream::Stdout, |t| t.blue()), message);
        }
    }

    /// Print a step message (for multi-step operations)
    pub fn step(step: usize, total: usize, message: &str) {
        if !Self::quiet() {
            let counter = format!("[{}/{}]", step, total);
            println!(
                "{} {}",
                counter.if_supports_color(Stream::Stdout, |t| t.dimmed()),
                message
            );
        }
    }

    /// Print a header
    pub fn header(message: &str) {
        if !Self::quiet() {
            println!();
            println!("{}", message.if_supports_color(Stream::Stdout, |t| t.bold()));
            println!("{}", "─".repeat(message.chars().count()));
        }
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
