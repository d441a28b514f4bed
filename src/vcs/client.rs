//! Version-control client trait definition.

use async_trait::async_trait;
use std::path::Path;

use crate::error::SyncError;

/// Trait for version-control clients managing the repository cache.
#[async_trait]
pub trait VcsClient: Send + Sync {
    /// Checks whether `dir` holds a local working copy.
    async fn is_local(&self, dir: &Path) -> bool;

    /// Gets the remote the working copy in `dir` tracks, if configured.
    async fn remote_url(&self, dir: &Path) -> Result<Option<String>, SyncError>;

    /// Clones `remote` into `dir`.
    async fn clone_repo(&self, remote: &str, dir: &Path) -> Result<(), SyncError>;

    /// Brings the working copy in `dir` up to date with its remote.
    async fn update(&self, dir: &Path) -> Result<(), SyncError>;

    /// Gets the client name for logs.
    fn client_name(&self) -> &str;
}
