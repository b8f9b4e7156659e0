//! CLI utilities for the Sea Lines screenshot tools
//!
//! Provides shared terminal output:
//! - Status messages
//! - Duration and count formatting

#![warn(missing_docs)]

pub mod output;
