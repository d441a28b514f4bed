//! CLI module for helmc.
//!
//! This module provides the command-line interface for installing charts
//! and managing the local chart repository.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
