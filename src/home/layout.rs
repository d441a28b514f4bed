//! Home directory layout.
//!
//! ```text
//! <home>/
//!   cache/charts/          working copy of the chart repository
//!   workspace/<chart>/     one directory per installed chart
//!     Chart.yaml
//!     manifests/*.yaml
//!   .helmc.lock            held while a command mutates the home
//! ```

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::chart::CHART_FILE;

/// Cache directory, relative to the home.
pub const CACHE_PATH: &str = "cache";

/// Repository working copy, relative to the home.
pub const CACHE_CHARTS_PATH: &str = "cache/charts";

/// Workspace directory, relative to the home.
pub const WORKSPACE_PATH: &str = "workspace";

/// Directories every home must contain.
pub const REQUIRED_DIRS: &[&str] = &[CACHE_PATH, WORKSPACE_PATH];

/// Lock file name.
const LOCK_FILE: &str = ".helmc.lock";

/// Paths under a home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLayout {
    /// Home directory.
    root: PathBuf,
}

impl HomeLayout {
    /// Creates a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The home directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths of the required subdirectories.
    #[must_use]
    pub fn required_dirs(&self) -> Vec<PathBuf> {
        REQUIRED_DIRS.iter().map(|d| self.root.join(d)).collect()
    }

    /// Working copy of the chart repository.
    #[must_use]
    pub fn repository_dir(&self) -> PathBuf {
        self.root.join(CACHE_CHARTS_PATH)
    }

    /// A chart inside the repository working copy.
    #[must_use]
    pub fn cache_chart_dir(&self, chart: &str) -> PathBuf {
        self.repository_dir().join(chart)
    }

    /// The workspace directory.
    #[must_use]
    pub fn workspace_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_PATH)
    }

    /// A chart inside the workspace.
    #[must_use]
    pub fn workspace_chart_dir(&self, chart: &str) -> PathBuf {
        self.workspace_dir().join(chart)
    }

    /// The installed-marker file of a workspace chart.
    #[must_use]
    pub fn chartfile_path(&self, chart: &str) -> PathBuf {
        self.workspace_chart_dir(chart).join(CHART_FILE)
    }

    /// The home lock file.
    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    /// Checks by workspace directory whether a chart is installed.
    ///
    /// Only the presence of `Chart.yaml` as a regular file counts; its
    /// content is not read.
    #[must_use]
    pub fn chart_installed(&self, chart: &str) -> bool {
        let path = self.chartfile_path(chart);
        debug!("Looking for {}", path.display());
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => true,
            Ok(_) => {
                debug!("No chart: {} is not a file", path.display());
                false
            }
            Err(e) => {
                debug!("No chart: {e}");
                false
            }
        }
    }
}
