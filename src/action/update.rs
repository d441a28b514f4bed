//! Update the local copy of the chart repository.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::Prerequisites;
use crate::error::Result;
use crate::home::{ensure_home, HomeLayout, HomeLock};
use crate::vcs::{RepositorySync, SyncOutcome, VcsClient};

/// Result of an update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    /// Remote repository.
    pub repository: String,
    /// Local working copy.
    pub path: PathBuf,
    /// What happened to the working copy.
    pub outcome: SyncOutcome,
}

/// Synchronizes the repository cache of a home.
pub struct Updater<'a> {
    /// Home layout.
    layout: &'a HomeLayout,
    /// Version-control client.
    vcs: &'a dyn VcsClient,
    /// Programs checked before anything else happens.
    prerequisites: Prerequisites,
}

impl std::fmt::Debug for Updater<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("layout", &self.layout)
            .field("vcs", &self.vcs.client_name())
            .field("prerequisites", &self.prerequisites)
            .finish()
    }
}

impl<'a> Updater<'a> {
    /// Creates an updater.
    #[must_use]
    pub const fn new(layout: &'a HomeLayout, vcs: &'a dyn VcsClient) -> Self {
        Self {
            layout,
            vcs,
            prerequisites: Prerequisites::new(),
        }
    }

    /// Sets the programs that must be on `PATH`.
    #[must_use]
    pub fn with_prerequisites(mut self, prerequisites: Prerequisites) -> Self {
        self.prerequisites = prerequisites;
        self
    }

    /// Clones or updates `repo` into the home's repository cache.
    ///
    /// # Errors
    ///
    /// Returns an error if a program is missing, the home cannot be prepared
    /// or locked, or synchronization fails.
    pub async fn update(&self, repo: &str) -> Result<UpdateReport> {
        self.prerequisites.ensure()?;
        ensure_home(self.layout).await?;

        let path = self.layout.repository_dir();
        let lock = HomeLock::acquire(self.layout).await?;
        let outcome = RepositorySync::new(self.vcs).sync(repo, &path).await;
        let released = lock.release().await;

        let outcome = outcome?;
        released?;

        Ok(UpdateReport {
            repository: repo.to_string(),
            path,
            outcome,
        })
    }
}
