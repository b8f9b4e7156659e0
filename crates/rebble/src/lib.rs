//! Rebble tool integration for Sea Lines
//!
//! This crate drives the external `rebble` command-line tool:
//! - Typed tool invocations (`build`, `wipe`, `kill`, `install`, `screenshot`)
//! - Capture plans covering every target platform
//! - The screenshot driver that executes a plan and stops on first failure

#![warn(missing_docs)]

pub mod error;
pub mod screenshots;
pub mod tool;

pub use error::{RebbleError, Result};
pub use screenshots::{capture_from_manifest, capture_screenshots, select_platforms, CapturePlan, CaptureReport};
pub use tool::{screenshot_filename, Rebble, ToolCommand};
