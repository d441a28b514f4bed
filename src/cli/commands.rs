//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// helmc - Install charts of Kubernetes manifests.
#[derive(Parser, Debug)]
#[command(name = "helmc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Home directory holding the repository cache and the workspace
    /// (defaults to ~/.helmc).
    #[arg(long, global = true, env = "HELMC_HOME")]
    pub home: Option<PathBuf>,

    /// Chart repository to clone and update.
    #[arg(long, global = true, env = "HELMC_REPO")]
    pub repo: Option<String>,

    /// Kubeconfig file passed to kubectl.
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context passed to kubectl.
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a chart, fetching it into the workspace first if needed.
    Install {
        /// Chart name.
        chart: String,

        /// Target namespace (recorded, not applied to manifests).
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Clone or update the local copy of the chart repository.
    Update,

    /// Copy a chart from the repository cache into the workspace.
    Fetch {
        /// Chart name in the repository.
        chart: String,

        /// Name of the workspace copy (defaults to the chart name).
        local_name: Option<String>,
    },

    /// List charts in the workspace.
    List,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}
