//! List charts installed in the workspace.

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::chart::ChartLoader;
use crate::error::{ChartError, Result};
use crate::home::HomeLayout;

/// An installed chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSummary {
    /// Workspace directory name.
    pub directory: String,
    /// Name from `Chart.yaml`.
    pub name: String,
    /// Version from `Chart.yaml`.
    pub version: String,
    /// Description from `Chart.yaml`.
    pub description: String,
    /// Chart directory.
    pub path: PathBuf,
}

/// Lists installed charts, sorted by directory name.
///
/// Directories without a `Chart.yaml` are ignored; charts whose
/// `Chart.yaml` cannot be parsed are skipped with a warning. A home without a
/// workspace has no charts.
///
/// # Errors
///
/// Returns an error if the workspace exists but cannot be read.
pub fn list_charts(layout: &HomeLayout) -> Result<Vec<ChartSummary>> {
    let workspace = layout.workspace_dir();
    if !workspace.is_dir() {
        debug!("No workspace at {}", workspace.display());
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&workspace).map_err(|e| ChartError::ReadFailed {
        path: workspace.clone(),
        message: e.to_string(),
    })?;

    let mut directories = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ChartError::ReadFailed {
            path: workspace.clone(),
            message: e.to_string(),
        })?;
        directories.push(entry.file_name().to_string_lossy().to_string());
    }
    directories.sort();

    let mut charts = Vec::new();
    for directory in directories {
        // Hidden entries are fetch staging directories.
        if directory.starts_with('.') || !layout.chart_installed(&directory) {
            continue;
        }

        match ChartLoader::load_chartfile(&layout.chartfile_path(&directory)) {
            Ok(chartfile) => charts.push(ChartSummary {
                path: layout.workspace_chart_dir(&directory),
                directory,
                name: chartfile.name,
                version: chartfile.version,
                description: chartfile.description,
            }),
            Err(e) => warn!("Skipping {directory}: {e}"),
        }
    }

    Ok(charts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lists_installed_charts_only() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path());
        for (dir, content) in [
            ("redis", "name: redis\nversion: 0.2.0\ndescription: Key-value store\n"),
            ("alpine", "name: alpine\nversion: 0.1.0\n"),
            ("broken", "name: [unterminated\n"),
        ] {
            std::fs::create_dir_all(layout.workspace_chart_dir(dir)).expect("create dir");
            std::fs::write(layout.chartfile_path(dir), content).expect("write file");
        }
        std::fs::create_dir_all(layout.workspace_chart_dir("empty")).expect("create dir");

        let charts = list_charts(&layout).expect("list");
        let names: Vec<&str> = charts.iter().map(|c| c.directory.as_str()).collect();

        assert_eq!(names, ["alpine", "redis"]);
        assert_eq!(charts[1].version, "0.2.0");
        assert_eq!(charts[1].description, "Key-value store");
    }

    #[test]
    fn test_missing_workspace_is_empty() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path().join("nowhere"));

        assert!(list_charts(&layout).expect("list").is_empty());
    }
}
