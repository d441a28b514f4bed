//! Repository synchronization.
//!
//! Keeps exactly one working copy of the chart repository per home
//! directory: cloned on first use, updated in place afterwards.

use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, SyncError};

use super::client::VcsClient;

/// What a sync did to the local copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    /// The repository was cloned, then updated.
    Cloned,
    /// An existing working copy was updated in place.
    Updated,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cloned => write!(f, "cloned"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

/// Synchronizes a remote repository into a local directory.
pub struct RepositorySync<'a> {
    /// Version-control client.
    vcs: &'a dyn VcsClient,
}

impl fmt::Debug for RepositorySync<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositorySync")
            .field("vcs", &self.vcs.client_name())
            .finish()
    }
}

impl<'a> RepositorySync<'a> {
    /// Creates a new repository sync.
    #[must_use]
    pub const fn new(vcs: &'a dyn VcsClient) -> Self {
        Self { vcs }
    }

    /// Ensures `dir` holds a working copy of `remote` at its latest state.
    ///
    /// # Errors
    ///
    /// Returns an error if cloning or updating fails, or if `dir` already
    /// tracks a different remote.
    pub async fn sync(&self, remote: &str, dir: &Path) -> Result<SyncOutcome> {
        let outcome = if self.vcs.is_local(dir).await {
            self.check_remote(remote, dir).await?;
            SyncOutcome::Updated
        } else {
            info!("Cloning repo into {}. Please wait.", dir.display());
            self.vcs.clone_repo(remote, dir).await?;
            SyncOutcome::Cloned
        };

        self.vcs.update(dir).await?;
        info!("Repository {} {}", dir.display(), outcome);
        Ok(outcome)
    }

    /// Rejects a working copy that tracks another remote.
    async fn check_remote(&self, remote: &str, dir: &Path) -> Result<()> {
        match self.vcs.remote_url(dir).await? {
            Some(found) if found != remote => Err(SyncError::RemoteMismatch {
                path: dir.to_path_buf(),
                expected: remote.to_string(),
                found,
            }
            .into()),
            Some(_) => Ok(()),
            None => {
                debug!("No origin configured in {}", dir.display());
                Ok(())
            }
        }
    }
}
