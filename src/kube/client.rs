//! Cluster client trait definition.

use async_trait::async_trait;

use crate::error::ApplyError;

/// Trait for clients that create resources in a cluster.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Creates the resource described by a serialized document.
    ///
    /// Returns once the resource has been accepted or rejected.
    async fn create(&self, document: &[u8]) -> Result<(), ApplyError>;

    /// Gets the client name for logs.
    fn client_name(&self) -> &str;
}

#[async_trait]
impl ClusterClient for Box<dyn ClusterClient> {
    async fn create(&self, document: &[u8]) -> Result<(), ApplyError> {
        (**self).create(document).await
    }

    fn client_name(&self) -> &str {
        (**self).client_name()
    }
}
