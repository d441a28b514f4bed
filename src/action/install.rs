//! Install a chart into the cluster.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chart::{validate_chart_name, ChartLoader, ChartValidator, DEFAULT_API_VERSION};
use crate::config::Prerequisites;
use crate::error::Result;
use crate::home::{ensure_home, HomeLayout, HomeLock};
use crate::kube::ClusterClient;
use crate::planner::{DeploymentPlan, ExecutionResult, PlanExecutor};

use super::fetch::Fetcher;

/// Result of an install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    /// Chart name.
    pub chart: String,
    /// Namespace requested on the command line.
    pub namespace: Option<String>,
    /// Whether the chart was fetched into the workspace by this install.
    pub fetched: bool,
    /// Validation warnings.
    pub warnings: Vec<String>,
    /// Manifests skipped because helmc does not install their kind.
    pub unsupported: Vec<String>,
    /// Resources created.
    pub result: ExecutionResult,
}

/// Installs charts from the workspace.
pub struct Installer<'a> {
    /// Home layout.
    layout: &'a HomeLayout,
    /// Cluster client.
    cluster: &'a dyn ClusterClient,
    /// Programs checked before anything else happens.
    prerequisites: Prerequisites,
}

impl std::fmt::Debug for Installer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("layout", &self.layout)
            .field("cluster", &self.cluster.client_name())
            .field("prerequisites", &self.prerequisites)
            .finish()
    }
}

impl<'a> Installer<'a> {
    /// Creates an installer.
    #[must_use]
    pub const fn new(layout: &'a HomeLayout, cluster: &'a dyn ClusterClient) -> Self {
        Self {
            layout,
            cluster,
            prerequisites: Prerequisites::new(),
        }
    }

    /// Sets the programs that must be on `PATH`.
    #[must_use]
    pub fn with_prerequisites(mut self, prerequisites: Prerequisites) -> Self {
        self.prerequisites = prerequisites;
        self
    }

    /// Installs `chart`, fetching it from the repository cache first if it
    /// is not in the workspace.
    ///
    /// The namespace is logged and reported; manifests are sent unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first failure: an invalid name, a missing program, an
    /// unusable or locked home, a failed fetch, an unloadable or invalid
    /// chart, or a resource the cluster rejected.
    pub async fn install(&self, chart: &str, namespace: Option<&str>) -> Result<InstallReport> {
        validate_chart_name(chart)?;
        self.prerequisites.ensure()?;
        ensure_home(self.layout).await?;

        let lock = HomeLock::acquire(self.layout).await?;
        let report = self.install_locked(chart, namespace).await;
        let released = lock.release().await;

        let report = report?;
        released?;
        Ok(report)
    }

    async fn install_locked(&self, chart: &str, namespace: Option<&str>) -> Result<InstallReport> {
        match namespace {
            Some(ns) => info!("Installing {} (namespace {})", chart, ns),
            None => info!("Installing {}", chart),
        }

        let fetched = if self.layout.chart_installed(chart) {
            debug!("{} is already in the workspace", chart);
            false
        } else {
            Fetcher::new(self.layout).fetch(chart, None)?;
            true
        };

        let loaded = ChartLoader::new().load(self.layout.workspace_chart_dir(chart))?;
        let validation = ChartValidator::new().validate(&loaded)?;
        for warning in &validation.warnings {
            warn!("{warning}");
        }

        let plan = DeploymentPlan::from_chart(&loaded, DEFAULT_API_VERSION);
        debug!("{plan}");

        let result = PlanExecutor::new(self.cluster).execute(&plan).await?;

        Ok(InstallReport {
            chart: chart.to_string(),
            namespace: namespace.map(ToString::to_string),
            fetched,
            warnings: validation.warnings,
            unsupported: loaded.unsupported.clone(),
            result,
        })
    }
}
