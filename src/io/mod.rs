//! Output handling for the CLI.
//!
//! This module provides:
//! - Output format selection (text, JSON)
//! - Exit codes

pub mod exit_code;
pub mod format;

pub use exit_code::ExitCode;
pub use format::{OutputFormat, print_json};
