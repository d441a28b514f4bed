//! Recording fakes for the external clients, shared by unit tests.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

use crate::error::{ApplyError, SyncError};
use crate::kube::ClusterClient;
use crate::vcs::VcsClient;

/// Cluster client that records every document it accepts.
#[derive(Debug, Default)]
pub struct RecordingCluster {
    /// 1-based attempt number that fails.
    fail_at: Option<usize>,
    attempts: Mutex<usize>,
    applied: Mutex<Vec<serde_json::Value>>,
}

impl RecordingCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(attempt: usize) -> Self {
        Self {
            fail_at: Some(attempt),
            ..Self::default()
        }
    }

    /// `Kind/name` of every accepted document, in order.
    pub fn applied_ids(&self) -> Vec<String> {
        self.applied
            .lock()
            .expect("lock")
            .iter()
            .map(|doc| {
                format!(
                    "{}/{}",
                    doc["kind"].as_str().unwrap_or_default(),
                    doc["metadata"]["name"].as_str().unwrap_or_default()
                )
            })
            .collect()
    }

    pub fn applied_documents(&self) -> Vec<serde_json::Value> {
        self.applied.lock().expect("lock").clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().expect("lock")
    }
}

#[async_trait]
impl ClusterClient for RecordingCluster {
    async fn create(&self, document: &[u8]) -> Result<(), ApplyError> {
        let attempt = {
            let mut attempts = self.attempts.lock().expect("lock");
            *attempts += 1;
            *attempts
        };

        if self.fail_at == Some(attempt) {
            return Err(ApplyError::ExitStatus {
                program: String::from("fake-kubectl"),
                code: Some(1),
                status: String::from("exit status: 1"),
            });
        }

        let doc = serde_json::from_slice(document).expect("documents are JSON");
        self.applied.lock().expect("lock").push(doc);
        Ok(())
    }

    fn client_name(&self) -> &str {
        "fake-kubectl"
    }
}

/// Version-control client keeping its working copy in memory.
#[derive(Debug, Default)]
pub struct FakeVcs {
    /// Remote of the existing working copy, if any.
    remote: Mutex<Option<String>>,
    fail_clone: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fake whose working copy already exists and tracks `remote`.
    pub fn with_clone(remote: &str) -> Self {
        Self {
            remote: Mutex::new(Some(remote.to_string())),
            ..Self::default()
        }
    }

    pub fn failing_clone(mut self) -> Self {
        self.fail_clone = true;
        self
    }

    /// Mutating calls, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl VcsClient for FakeVcs {
    async fn is_local(&self, _dir: &Path) -> bool {
        self.remote.lock().expect("lock").is_some()
    }

    async fn remote_url(&self, _dir: &Path) -> Result<Option<String>, SyncError> {
        Ok(self.remote.lock().expect("lock").clone())
    }

    async fn clone_repo(&self, remote: &str, dir: &Path) -> Result<(), SyncError> {
        self.calls
            .lock()
            .expect("lock")
            .push(format!("clone {remote} {}", dir.display()));

        if self.fail_clone {
            return Err(SyncError::CloneFailed {
                remote: remote.to_string(),
                path: dir.to_path_buf(),
                message: String::from("fatal: repository not found"),
            });
        }

        *self.remote.lock().expect("lock") = Some(remote.to_string());
        Ok(())
    }

    async fn update(&self, dir: &Path) -> Result<(), SyncError> {
        self.calls
            .lock()
            .expect("lock")
            .push(format!("update {}", dir.display()));
        Ok(())
    }

    fn client_name(&self) -> &str {
        "fake-git"
    }
}
