//! `git`-backed version-control client.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use crate::error::SyncError;

use super::client::VcsClient;

/// Default version-control program.
pub const DEFAULT_GIT: &str = "git";

/// Version-control client that shells out to `git`.
#[derive(Debug, Clone)]
pub struct GitClient {
    /// Program to run.
    program: String,
}

impl Default for GitClient {
    fn default() -> Self {
        Self::with_program(DEFAULT_GIT)
    }
}

impl GitClient {
    /// Creates a client running `git` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client running the given program.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs the client with captured output.
    async fn run<I, S>(&self, args: I, dir: Option<&Path>) -> Result<Output, SyncError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        cmd.output().await.map_err(|e| SyncError::CommandFailed {
            program: self.program.clone(),
            message: e.to_string(),
        })
    }
}

/// Best description of a failed invocation.
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        format!("{}: {stderr}", output.status)
    }
}

#[async_trait]
impl VcsClient for GitClient {
    async fn is_local(&self, dir: &Path) -> bool {
        tokio::fs::metadata(dir.join(".git"))
            .await
            .is_ok_and(|m| m.is_dir())
    }

    async fn remote_url(&self, dir: &Path) -> Result<Option<String>, SyncError> {
        let output = self
            .run(["config", "--get", "remote.origin.url"], Some(dir))
            .await?;

        // `git config --get` exits 1 when the key is unset.
        if !output.status.success() {
            return Ok(None);
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!url.is_empty()).then_some(url))
    }

    async fn clone_repo(&self, remote: &str, dir: &Path) -> Result<(), SyncError> {
        debug!("{} clone {} {}", self.program, remote, dir.display());
        let output = self
            .run([OsStr::new("clone"), OsStr::new(remote), dir.as_os_str()], None)
            .await?;

        if !output.status.success() {
            return Err(SyncError::CloneFailed {
                remote: remote.to_string(),
                path: dir.to_path_buf(),
                message: failure_message(&output),
            });
        }
        Ok(())
    }

    async fn update(&self, dir: &Path) -> Result<(), SyncError> {
        for args in [["fetch", "--tags", "origin"].as_slice(), ["pull"].as_slice()] {
            debug!("{} {} in {}", self.program, args.join(" "), dir.display());
            let output = self.run(args, Some(dir)).await?;
            if !output.status.success() {
                return Err(SyncError::UpdateFailed {
                    path: dir.to_path_buf(),
                    message: failure_message(&output),
                });
            }
        }
        Ok(())
    }

    fn client_name(&self) -> &str {
        &self.program
    }
}
