//! Error types for the helmc deployment client.
//!
//! Every failure is returned as a value and converted into a diagnostic and a
//! non-zero exit status only at the top of `main`.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for helmc.
#[derive(Debug, Error)]
pub enum HelmcError {
    /// Configuration and environment errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Chart loading errors.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// Repository synchronization errors.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Deployment aborted part-way through a chart. Serializer and cluster
    /// client failures always arrive here, wrapped with the resources
    /// applied before them.
    #[error("Deployment failed: {0}")]
    Deploy(#[from] DeployError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration and environment errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required program could not be found on `PATH`.
    #[error("Could not find '{program}' on $PATH: {message}")]
    MissingExecutable {
        /// Program name that was looked up.
        program: String,
        /// Lookup failure description.
        message: String,
    },

    /// The home path exists but is not a directory.
    #[error("{path} must be a directory")]
    HomeNotDirectory {
        /// The offending home path.
        path: PathBuf,
    },

    /// The home path could not be resolved or created.
    #[error("Invalid home directory {path}: {message}")]
    InvalidHome {
        /// The offending home path.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// The home directory is locked by another invocation.
    #[error("Home directory is locked by another process (lock holder: {holder}, since: {since})")]
    HomeLocked {
        /// Identifier of the lock holder.
        holder: String,
        /// When the lock was acquired.
        since: String,
    },

    /// A chart name that cannot be used as a workspace directory.
    #[error("Invalid chart name {name:?}: {reason}")]
    InvalidChartName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The `.env` file could not be loaded.
    #[error("Failed to load {path}: {message}")]
    DotEnv {
        /// Path of the `.env` file.
        path: PathBuf,
        /// Loader error.
        message: String,
    },
}

/// Errors raised while locating, reading, or validating a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// `Chart.yaml` is missing from the chart directory.
    #[error("Chart file not found: {path}")]
    ChartfileNotFound {
        /// Expected location of `Chart.yaml`.
        path: PathBuf,
    },

    /// A chart file could not be read.
    #[error("Failed to read {path}: {message}")]
    ReadFailed {
        /// File or directory that failed.
        path: PathBuf,
        /// Underlying IO error.
        message: String,
    },

    /// A chart file is not valid YAML for its expected shape.
    #[error("Failed to parse {path}: {message}")]
    ParseError {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A manifest document is structurally unusable.
    #[error("Invalid manifest in {path}: {message}")]
    InvalidManifest {
        /// File containing the manifest.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// The chart failed validation.
    #[error("Chart validation failed: {message}")]
    ValidationError {
        /// Description of the first violation.
        message: String,
    },

    /// The chart is not present in the repository cache.
    #[error("Chart {chart:?} not found in {path}. Run 'helmc update' first")]
    NotInCache {
        /// Requested chart.
        chart: String,
        /// Where it was looked up.
        path: PathBuf,
    },

    /// The chart has already been fetched into the workspace.
    #[error("Chart {chart:?} is already in the workspace at {path}")]
    AlreadyFetched {
        /// Local chart name.
        chart: String,
        /// Existing workspace directory.
        path: PathBuf,
    },

    /// Something other than a fetched chart occupies the workspace target.
    #[error("{path} already exists but is not a chart; remove it or fetch under another name")]
    WorkspaceConflict {
        /// Occupied workspace path.
        path: PathBuf,
    },
}

/// A resource could not be encoded for the cluster client.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The resource holds values JSON cannot represent.
    #[error("Cannot encode {resource}: {message}")]
    Encode {
        /// Resource identifier (`Kind/name`).
        resource: String,
        /// Encoder message.
        message: String,
    },
}

/// Errors from the external cluster client.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The client process could not be started.
    #[error("Failed to start '{program}': {message}")]
    Spawn {
        /// Program that was launched.
        program: String,
        /// Spawn failure description.
        message: String,
    },

    /// The document could not be written to the client's stdin.
    #[error("Failed to write document to '{program}': {message}")]
    Stdin {
        /// Program being fed.
        program: String,
        /// Write failure description.
        message: String,
    },

    /// Waiting on the client process failed.
    #[error("Failed to wait for '{program}': {message}")]
    Wait {
        /// Program being awaited.
        program: String,
        /// Wait failure description.
        message: String,
    },

    /// The client exited unsuccessfully.
    #[error("'{program}' exited with {status}")]
    ExitStatus {
        /// Program that failed.
        program: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Rendered exit status.
        status: String,
    },
}

/// Errors from the version-control client.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The version-control program could not be run.
    #[error("Failed to run '{program}': {message}")]
    CommandFailed {
        /// Program that was launched.
        program: String,
        /// Failure description.
        message: String,
    },

    /// Cloning the remote failed.
    #[error("Could not create repository in {path} from {remote}: {message}")]
    CloneFailed {
        /// Remote address.
        remote: String,
        /// Target directory.
        path: PathBuf,
        /// Client output.
        message: String,
    },

    /// Updating the local copy failed.
    #[error("Failed to update {path}: {message}")]
    UpdateFailed {
        /// Local working copy.
        path: PathBuf,
        /// Client output.
        message: String,
    },

    /// The local copy tracks a different remote.
    #[error("Repository in {path} tracks {found}, not {expected}")]
    RemoteMismatch {
        /// Local working copy.
        path: PathBuf,
        /// Requested remote.
        expected: String,
        /// Remote configured in the working copy.
        found: String,
    },
}

/// A deployment stopped at its first failing resource.
#[derive(Debug, Error)]
pub enum DeployError {
    /// A resource failed to serialize.
    #[error("{resource} could not be serialized: {source}")]
    Serialize {
        /// Failing resource (`Kind/name`).
        resource: String,
        /// Resources applied before the failure, in order.
        applied: Vec<String>,
        /// Underlying error.
        source: SerializeError,
    },

    /// The cluster client rejected a resource.
    #[error("{resource} could not be applied: {source}")]
    Apply {
        /// Failing resource (`Kind/name`).
        resource: String,
        /// Resources applied before the failure, in order.
        applied: Vec<String>,
        /// Underlying error.
        source: ApplyError,
    },
}

/// Result type alias for helmc operations.
pub type Result<T> = std::result::Result<T, HelmcError>;

impl HelmcError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Resources that reached the cluster before a deployment failure.
    #[must_use]
    pub fn applied_resources(&self) -> &[String] {
        match self {
            Self::Deploy(err) => err.applied(),
            _ => &[],
        }
    }
}

impl ConfigError {
    /// Creates an invalid chart name error.
    #[must_use]
    pub fn invalid_chart_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidChartName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl ChartError {
    /// Creates a chart validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// Creates an invalid manifest error.
    #[must_use]
    pub fn invalid_manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl DeployError {
    /// Returns the resources applied before the failure.
    #[must_use]
    pub fn applied(&self) -> &[String] {
        match self {
            Self::Serialize { applied, .. } | Self::Apply { applied, .. } => applied,
        }
    }

    /// Replaces the list of resources applied before the failure.
    #[must_use]
    pub fn with_applied(mut self, resources: Vec<String>) -> Self {
        match &mut self {
            Self::Serialize { applied, .. } | Self::Apply { applied, .. } => *applied = resources,
        }
        self
    }

    /// Returns the resource that failed.
    #[must_use]
    pub fn resource(&self) -> &str {
        match self {
            Self::Serialize { resource, .. } | Self::Apply { resource, .. } => resource,
        }
    }
}

impl ApplyError {
    /// Returns the exit code of a failed client, if any.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExitStatus { code, .. } => *code,
            _ => None,
        }
    }
}
