//! Output formatting for CLI commands.
//!
//! This module renders command results as text tables or JSON documents.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::action::{ChartSummary, FetchReport, InstallReport, UpdateReport};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Created resource row for table display.
#[derive(Tabled)]
struct AppliedRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Digest")]
    digest: String,
}

/// Installed chart row for table display.
#[derive(Tabled)]
struct ChartRow {
    #[tabled(rename = "Directory")]
    directory: String,
    #[tabled(rename = "Chart")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of an install.
    #[must_use]
    pub fn format_install(&self, report: &InstallReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => Self::format_install_text(report),
        }
    }

    fn format_install_text(report: &InstallReport) -> String {
        let mut output = String::new();

        let _ = write!(output, "\nChart: {}", report.chart.bold());
        if let Some(ns) = &report.namespace {
            let _ = write!(output, " (namespace {ns})");
        }
        output.push('\n');
        if report.fetched {
            let _ = writeln!(output, "   Fetched into the workspace");
        }
        output.push('\n');

        if report.result.applied.is_empty() {
            let _ = writeln!(output, "   No resources to create.");
        } else {
            let rows: Vec<AppliedRow> = report
                .result
                .applied
                .iter()
                .enumerate()
                .map(|(i, a)| AppliedRow {
                    index: i + 1,
                    category: a.category.to_string(),
                    resource: a.resource.clone(),
                    digest: Self::truncate(&a.digest, 12),
                })
                .collect();
            output.push_str(&Table::new(rows).to_string());
            output.push('\n');
        }

        for warning in &report.warnings {
            let _ = writeln!(output, "{} {warning}", "!".yellow());
        }
        for skipped in &report.unsupported {
            let _ = writeln!(output, "{} Skipped {skipped}: kind is not installable", "!".yellow());
        }

        let _ = writeln!(
            output,
            "\n{} {} resources created",
            "✓".green(),
            report.result.applied_count()
        );

        output
    }

    /// Formats the result of an update.
    #[must_use]
    pub fn format_update(&self, report: &UpdateReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => format!(
                "{} Repository {} {} in {}\n",
                "✓".green(),
                report.repository,
                report.outcome,
                report.path.display()
            ),
        }
    }

    /// Formats the result of a fetch.
    #[must_use]
    pub fn format_fetch(&self, report: &FetchReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => format!(
                "{} Fetched {} to {} ({} files)\n",
                "✓".green(),
                report.chart,
                report.path.display(),
                report.files
            ),
        }
    }

    /// Formats the charts installed in the workspace.
    #[must_use]
    pub fn format_list(&self, charts: &[ChartSummary]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(charts).unwrap_or_default(),
            OutputFormat::Text => {
                if charts.is_empty() {
                    return String::from("No charts in the workspace.\n");
                }

                let rows: Vec<ChartRow> = charts
                    .iter()
                    .map(|c| ChartRow {
                        directory: c.directory.clone(),
                        name: c.name.clone(),
                        version: c.version.clone(),
                        description: Self::truncate(&c.description, 50),
                    })
                    .collect();

                let mut output = Table::new(rows).to_string();
                output.push('\n');
                output
            }
        }
    }

    /// Truncates a string to `max_len` characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{kept}...")
        }
    }
}
