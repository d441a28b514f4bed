//! `kubectl`-backed cluster client.
//!
//! Each resource is created by a separate `kubectl create -f -` process that
//! reads the document from stdin. The child's stdout and stderr are the
//! caller's own, so kubectl's messages reach the terminal unchanged.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::ApplyError;

use super::client::ClusterClient;

/// Default cluster client program.
pub const DEFAULT_KUBECTL: &str = "kubectl";

/// Cluster client that shells out to `kubectl`.
#[derive(Debug, Clone)]
pub struct KubectlClient {
    /// Program to run.
    program: String,
    /// Optional kubeconfig file.
    kubeconfig: Option<PathBuf>,
    /// Optional kubeconfig context.
    context: Option<String>,
}

impl Default for KubectlClient {
    fn default() -> Self {
        Self::with_program(DEFAULT_KUBECTL)
    }
}

impl KubectlClient {
    /// Creates a client running `kubectl` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client running the given program.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            kubeconfig: None,
            context: None,
        }
    }

    /// Sets the kubeconfig file passed to every invocation.
    #[must_use]
    pub fn with_kubeconfig(mut self, kubeconfig: Option<PathBuf>) -> Self {
        self.kubeconfig = kubeconfig;
        self
    }

    /// Sets the kubeconfig context passed to every invocation.
    #[must_use]
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    /// Arguments for a create-from-stdin invocation.
    #[must_use]
    pub fn create_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push(OsString::from("--kubeconfig"));
            args.push(kubeconfig.clone().into_os_string());
        }
        if let Some(context) = &self.context {
            args.push(OsString::from("--context"));
            args.push(OsString::from(context));
        }
        args.extend(["create", "-f", "-"].map(OsString::from));
        args
    }
}

#[async_trait]
impl ClusterClient for KubectlClient {
    async fn create(&self, document: &[u8]) -> Result<(), ApplyError> {
        let args = self.create_args();
        debug!("Running {} {:?}", self.program, args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ApplyError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        // Write, then close stdin so kubectl sees EOF.
        let written = match child.stdin.take() {
            Some(mut stdin) => {
                let result = match stdin.write_all(document).await {
                    Ok(()) => stdin.shutdown().await,
                    Err(e) => Err(e),
                };
                drop(stdin);
                result
            }
            None => Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stdin was not captured",
            )),
        };

        let status = child.wait().await.map_err(|e| ApplyError::Wait {
            program: self.program.clone(),
            message: e.to_string(),
        })?;

        // A rejected document often closes the pipe early; the exit status is
        // the more useful report.
        if !status.success() {
            return Err(ApplyError::ExitStatus {
                program: self.program.clone(),
                code: status.code(),
                status: status.to_string(),
            });
        }

        written.map_err(|e| ApplyError::Stdin {
            program: self.program.clone(),
            message: e.to_string(),
        })
    }

    fn client_name(&self) -> &str {
        &self.program
    }
}
