//! Chart validation.
//!
//! Catches charts that would fail half-way through a deployment: resources
//! without names, duplicate resources, and chart names that cannot be used as
//! workspace directories.

use std::collections::HashSet;
use tracing::debug;

use crate::error::{ChartError, ConfigError, Result};

use super::model::Chart;

/// Validation result containing everything found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors; any entry makes the chart uninstallable.
    pub errors: Vec<String>,
    /// Non-fatal issues.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validator for loaded charts.
#[derive(Debug, Default)]
pub struct ChartValidator;

impl ChartValidator {
    /// Creates a new chart validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a loaded chart.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, if any.
    pub fn validate(&self, chart: &Chart) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        if chart.chartfile.name.is_empty() {
            result
                .warnings
                .push(format!("{}: Chart.yaml has no name", chart.name));
        } else if chart.chartfile.name != chart.name {
            result.warnings.push(format!(
                "Chart.yaml names the chart {:?}, installed as {:?}",
                chart.chartfile.name, chart.name
            ));
        }

        if chart.is_empty() {
            result
                .warnings
                .push(format!("{}: no installable manifests", chart.name));
        }

        // Keyed on (kind, namespace, name); server-named resources never collide.
        let mut seen = HashSet::new();
        for (_, manifest) in chart.manifests() {
            let kind = manifest.kind().unwrap_or("<unknown>");
            match (manifest.name(), manifest.generate_name()) {
                (Some(name), _) if !name.is_empty() => {
                    let namespace = manifest.namespace();
                    if !seen.insert((kind, namespace, name)) {
                        result.errors.push(match namespace {
                            Some(ns) => format!("Duplicate resource: {kind}/{name} in namespace {ns}"),
                            None => format!("Duplicate resource: {kind}/{name}"),
                        });
                    }
                }
                (_, Some(prefix)) if !prefix.is_empty() => {
                    debug!("{} will be named by the server", manifest.id());
                }
                _ => result.errors.push(format!(
                    "{kind} in {} has no metadata.name or metadata.generateName",
                    manifest.source().display()
                )),
            }
        }

        if let Some(first) = result.errors.first() {
            return Err(ChartError::validation(first.clone()).into());
        }

        debug!(
            "Chart {} passed validation with {} warnings",
            chart.name,
            result.warnings.len()
        );
        Ok(result)
    }
}

/// Checks that `name` can be used as a single workspace path component.
///
/// # Errors
///
/// Returns an error for empty names, `.`/`..`, and names containing path
/// separators.
pub fn validate_chart_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name cannot be empty")
    } else if name == "." || name == ".." {
        Some("name cannot be a relative directory")
    } else if name.contains(['/', '\\']) {
        Some("name cannot contain path separators")
    } else if name.chars().any(char::is_control) {
        Some("name cannot contain control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::invalid_chart_name(name, reason).into()),
        None => Ok(()),
    }
}
