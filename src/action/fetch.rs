//! Fetch a chart from the repository cache into the workspace.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::chart::validate_chart_name;
use crate::error::{ChartError, Result};
use crate::home::{ensure_home, HomeLayout, HomeLock};

/// Result of a fetch.
#[derive(Debug, Clone, Serialize)]
pub struct FetchReport {
    /// Chart name in the repository.
    pub chart: String,
    /// Name of the workspace copy.
    pub local_name: String,
    /// Workspace directory written.
    pub path: PathBuf,
    /// Number of files copied.
    pub files: usize,
}

/// Copies charts out of the repository cache.
#[derive(Debug)]
pub struct Fetcher<'a> {
    /// Home layout.
    layout: &'a HomeLayout,
}

impl<'a> Fetcher<'a> {
    /// Creates a fetcher for `layout`'s home.
    #[must_use]
    pub const fn new(layout: &'a HomeLayout) -> Self {
        Self { layout }
    }

    /// Bootstraps the home, takes its lock, and fetches `chart`.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is invalid, the home cannot be prepared or
    /// locked, or the fetch fails.
    pub async fn run(&self, chart: &str, local_name: Option<&str>) -> Result<FetchReport> {
        validate_chart_name(chart)?;
        if let Some(local) = local_name {
            validate_chart_name(local)?;
        }

        ensure_home(self.layout).await?;
        let lock = HomeLock::acquire(self.layout).await?;
        let report = self.fetch(chart, local_name);
        let released = lock.release().await;

        let report = report?;
        released?;
        Ok(report)
    }

    /// Copies `chart` from the cache to `workspace/<local_name>`.
    ///
    /// `local_name` defaults to the chart name. Callers hold the home lock.
    /// Files are copied into a staging directory next to the target and
    /// renamed into place, so the target only ever holds a complete chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart is not in the cache, anything already
    /// exists at the target, or a file cannot be copied.
    pub fn fetch(&self, chart: &str, local_name: Option<&str>) -> Result<FetchReport> {
        let local_name = local_name.unwrap_or(chart);
        let source = self.layout.cache_chart_dir(chart);
        let target = self.layout.workspace_chart_dir(local_name);

        if !source.is_dir() {
            return Err(ChartError::NotInCache {
                chart: chart.to_string(),
                path: self.layout.repository_dir(),
            }
            .into());
        }

        if self.layout.chart_installed(local_name) {
            return Err(ChartError::AlreadyFetched {
                chart: local_name.to_string(),
                path: target,
            }
            .into());
        }

        if fs::symlink_metadata(&target).is_ok() {
            return Err(ChartError::WorkspaceConflict { path: target }.into());
        }

        info!("Fetching {} into {}", chart, target.display());

        let workspace = self.layout.workspace_dir();
        fs::create_dir_all(&workspace)?;
        let staging = workspace.join(format!(".{local_name}.fetch-{}", Uuid::new_v4().simple()));

        let files = match copy_tree(&source, &staging).and_then(|files| {
            fs::rename(&staging, &target)?;
            Ok(files)
        }) {
            Ok(files) => files,
            Err(e) => {
                warn!("Removing partial copy at {}", staging.display());
                if let Err(cleanup) = fs::remove_dir_all(&staging) {
                    debug!("Cleanup of {} failed: {cleanup}", staging.display());
                }
                return Err(e);
            }
        };

        debug!("Copied {} files from {}", files, source.display());

        Ok(FetchReport {
            chart: chart.to_string(),
            local_name: local_name.to_string(),
            path: target,
            files,
        })
    }
}

/// Recursively copies `source` into `target`, returning the file count.
fn copy_tree(source: &Path, target: &Path) -> Result<usize> {
    let mut files = 0;

    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| ChartError::ReadFailed {
            path: e.path().map_or_else(|| source.to_path_buf(), Path::to_path_buf),
            message: e.to_string(),
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| ChartError::ReadFailed {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
        // The VCS metadata directory never belongs to a chart.
        if relative.starts_with(".git") {
            continue;
        }
        let dest = target.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&dest)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &dest).map_err(|e| ChartError::ReadFailed {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
            files += 1;
        } else {
            debug!("Skipping {}", entry.path().display());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, HelmcError};
    use tempfile::TempDir;

    fn seed_cache(layout: &HomeLayout, chart: &str) {
        let dir = layout.cache_chart_dir(chart);
        std::fs::create_dir_all(dir.join("manifests")).expect("create dir");
        std::fs::write(dir.join("Chart.yaml"), format!("name: {chart}\n")).expect("write file");
        std::fs::write(
            dir.join("manifests").join("pod.yaml"),
            "kind: Pod\nmetadata:\n  name: web\n",
        )
        .expect("write file");
    }

    #[test]
    fn test_fetch_copies_chart() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path());
        seed_cache(&layout, "web");

        let report = Fetcher::new(&layout).fetch("web", None).expect("fetch");

        assert_eq!(report.files, 2);
        assert_eq!(report.path, layout.workspace_chart_dir("web"));
        assert!(layout.chart_installed("web"));
        assert!(layout
            .workspace_chart_dir("web")
            .join("manifests/pod.yaml")
            .is_file());
    }

    #[test]
    fn test_fetch_under_local_name_then_refuses_overwrite() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path());
        seed_cache(&layout, "web");
        let fetcher = Fetcher::new(&layout);

        fetcher.fetch("web", Some("web-staging")).expect("fetch");
        assert!(layout.chart_installed("web-staging"));
        assert!(!layout.chart_installed("web"));

        let err = fetcher.fetch("web", Some("web-staging")).unwrap_err();
        assert!(matches!(
            err,
            HelmcError::Chart(ChartError::AlreadyFetched { .. })
        ));
    }

    #[test]
    fn test_existing_directory_is_left_alone() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path());
        seed_cache(&layout, "web");
        let stale = layout.workspace_chart_dir("web").join("manifests");
        std::fs::create_dir_all(&stale).expect("create dir");
        std::fs::write(stale.join("stale.yaml"), "kind: Pod\nmetadata:\n  name: stale\n")
            .expect("write file");

        let err = Fetcher::new(&layout).fetch("web", None).unwrap_err();

        assert!(matches!(
            err,
            HelmcError::Chart(ChartError::WorkspaceConflict { .. })
        ));
        assert!(stale.join("stale.yaml").is_file());
        assert!(!layout.chart_installed("web"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_copy_leaves_workspace_untouched() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path());
        seed_cache(&layout, "web");
        std::os::unix::fs::symlink(
            temp.path().join("missing-target"),
            layout.cache_chart_dir("web").join("manifests").join("dangling.yaml"),
        )
        .expect("create symlink");
        std::fs::create_dir_all(layout.workspace_chart_dir("other")).expect("create dir");
        std::fs::write(layout.workspace_chart_dir("other").join("notes.txt"), "keep")
            .expect("write file");

        let err = Fetcher::new(&layout).fetch("web", None).unwrap_err();

        assert!(matches!(err, HelmcError::Chart(ChartError::ReadFailed { .. })));
        assert!(!layout.workspace_chart_dir("web").exists());
        assert!(layout.workspace_chart_dir("other").join("notes.txt").is_file());
        let entries: Vec<_> = std::fs::read_dir(layout.workspace_dir())
            .expect("read dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, ["other"]);
    }

    #[test]
    fn test_missing_chart_is_not_in_cache() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path());

        let err = Fetcher::new(&layout).fetch("nope", None).unwrap_err();

        assert!(matches!(err, HelmcError::Chart(ChartError::NotInCache { .. })));
        assert!(!layout.workspace_chart_dir("nope").exists());
    }

    #[tokio::test]
    async fn test_run_bootstraps_and_releases_lock() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path().join("home"));
        seed_cache(&layout, "web");

        let report = Fetcher::new(&layout).run("web", None).await.expect("run");

        assert_eq!(report.local_name, "web");
        assert!(layout.workspace_dir().is_dir());
        assert!(!layout.lock_path().exists());
    }

    #[tokio::test]
    async fn test_run_rejects_bad_local_name() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path());

        let err = Fetcher::new(&layout).run("web", Some("../escape")).await.unwrap_err();

        assert!(matches!(
            err,
            HelmcError::Config(ConfigError::InvalidChartName { .. })
        ));
    }
}
