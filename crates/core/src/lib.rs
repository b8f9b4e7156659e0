//! Core utilities for the Sea Lines screenshot tools
//!
//! Shared functionality used by the tool wrapper and the CLI:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Process execution**: the [`process::CommandRunner`] seam over external tools
//! - **Configuration**: optional TOML tool configuration
//! - **Manifest**: the watchface `package.json` and its target platforms
//! - **Health checks**: verify the tool and manifest before a run
//!
//! # Example
//!
//! ```rust,no_run
//! use sealines_core::manifest::PackageManifest;
//!
//! let manifest = PackageManifest::load("package.json").expect("manifest");
//! for platform in manifest.target_platforms() {
//!     println!("{platform}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
#[allow(missing_docs)]
pub mod error;
pub mod health;
pub mod manifest;
pub mod process;

pub use error::{Error, ErrorCode, Result, ResultExt};

