//! Runtime settings.
//!
//! Settings come from command-line flags (which fall back to `HELMC_HOME` and
//! `HELMC_REPO`), then environment overrides for the external programs, then
//! built-in defaults.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::home::HomeLayout;
use crate::kube::DEFAULT_KUBECTL;
use crate::vcs::DEFAULT_GIT;

/// Home directory name under the user's home when none is given.
pub const DEFAULT_HOME_DIR: &str = ".helmc";

/// Chart repository used when none is given.
pub const DEFAULT_REPO: &str = "https://github.com/helm/charts";

/// Environment variable naming the version-control program.
pub const GIT_PROGRAM_ENV: &str = "HELMC_GIT";

/// Environment variable naming the cluster client program.
pub const KUBECTL_PROGRAM_ENV: &str = "HELMC_KUBECTL";

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Absolute home directory.
    pub home: PathBuf,
    /// Chart repository remote.
    pub repo: String,
    /// Version-control program.
    pub git_program: String,
    /// Cluster client program.
    pub kubectl_program: String,
    /// Kubeconfig file forwarded to the cluster client.
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context forwarded to the cluster client.
    pub context: Option<String>,
}

impl Settings {
    /// Resolves settings from optional flag values.
    ///
    /// # Errors
    ///
    /// Returns an error if no home is given and the user's home directory is
    /// unknown, or if the home cannot be made absolute.
    pub fn resolve(home: Option<PathBuf>, repo: Option<String>) -> Result<Self> {
        let home = match home {
            Some(home) => home,
            None => default_home().ok_or_else(|| ConfigError::InvalidHome {
                path: PathBuf::from("~").join(DEFAULT_HOME_DIR),
                message: String::from("cannot determine the user's home directory; pass --home"),
            })?,
        };

        let mut settings = Self {
            home: absolute_home(&home)?,
            repo: repo.unwrap_or_else(|| DEFAULT_REPO.to_string()),
            git_program: DEFAULT_GIT.to_string(),
            kubectl_program: DEFAULT_KUBECTL.to_string(),
            kubeconfig: None,
            context: None,
        };
        settings.apply_env_overrides();

        debug!("Using home {} and repository {}", settings.home.display(), settings.repo);
        Ok(settings)
    }

    /// Sets the kubeconfig file and context forwarded to the cluster client.
    #[must_use]
    pub fn with_kube(mut self, kubeconfig: Option<PathBuf>, context: Option<String>) -> Self {
        self.kubeconfig = kubeconfig;
        self.context = context;
        self
    }

    /// The home directory layout.
    #[must_use]
    pub fn layout(&self) -> HomeLayout {
        HomeLayout::new(&self.home)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, ignoring empty values.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(git) = lookup(GIT_PROGRAM_ENV).filter(|v| !v.is_empty()) {
            debug!("Overriding git program from environment");
            self.git_program = git;
        }

        if let Some(kubectl) = lookup(KUBECTL_PROGRAM_ENV).filter(|v| !v.is_empty()) {
            debug!("Overriding kubectl program from environment");
            self.kubectl_program = kubectl;
        }
    }

    /// Loads `dir/.env` into the process environment if present.
    ///
    /// Runs before logging is set up, so the loaded path is returned for the
    /// caller to report.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn load_dotenv(dir: &Path) -> Result<Option<PathBuf>> {
        let env_path = dir.join(".env");
        if !env_path.is_file() {
            return Ok(None);
        }

        dotenvy::from_path(&env_path).map_err(|e| ConfigError::DotEnv {
            path: env_path.clone(),
            message: e.to_string(),
        })?;
        Ok(Some(env_path))
    }
}

/// The default home directory, `~/.helmc`.
#[must_use]
pub fn default_home() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(DEFAULT_HOME_DIR))
}

/// Makes `home` absolute without touching the filesystem.
///
/// # Errors
///
/// Returns an error for an empty path or when the current directory is
/// unavailable.
pub fn absolute_home(home: &Path) -> Result<PathBuf> {
    std::path::absolute(home).map_err(|e| {
        ConfigError::InvalidHome {
            path: home.to_path_buf(),
            message: format!("could not generate absolute path: {e}"),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_resolve_with_explicit_values() {
        let settings = Settings::resolve(
            Some(PathBuf::from("/srv/helmc")),
            Some(String::from("https://example.com/charts.git")),
        )
        .expect("resolve");

        assert_eq!(settings.home, PathBuf::from("/srv/helmc"));
        assert_eq!(settings.repo, "https://example.com/charts.git");
        assert_eq!(
            settings.layout().repository_dir(),
            PathBuf::from("/srv/helmc/cache/charts")
        );
    }

    #[test]
    fn test_relative_home_is_made_absolute() {
        let home = absolute_home(Path::new("relative/home")).expect("absolute");
        assert!(home.is_absolute());
        assert!(home.ends_with("relative/home"));
        assert!(absolute_home(Path::new("")).is_err());
    }

    #[test]
    fn test_program_overrides() {
        let mut settings = Settings::resolve(Some(PathBuf::from("/srv/helmc")), None)
            .expect("resolve")
            .with_kube(None, Some(String::from("prod")));
        let env: HashMap<&str, &str> = [(KUBECTL_PROGRAM_ENV, "/opt/bin/kubectl"), (GIT_PROGRAM_ENV, "")]
            .into_iter()
            .collect();

        settings.git_program = DEFAULT_GIT.to_string();
        settings.apply_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(settings.kubectl_program, "/opt/bin/kubectl");
        assert_eq!(settings.git_program, DEFAULT_GIT);
        assert_eq!(settings.context.as_deref(), Some("prod"));
        assert_eq!(settings.repo, DEFAULT_REPO);
    }

    #[test]
    fn test_missing_dotenv_is_ignored() {
        let temp = tempfile::TempDir::new().expect("Failed to create temp dir");
        assert_eq!(Settings::load_dotenv(temp.path()).expect("load"), None);
    }

    #[test]
    fn test_dotenv_reports_loaded_file() {
        let temp = tempfile::TempDir::new().expect("Failed to create temp dir");
        let env_path = temp.path().join(".env");
        std::fs::write(&env_path, "HELMC_SETTINGS_TEST_ONLY=1\n").expect("write file");

        assert_eq!(Settings::load_dotenv(temp.path()).expect("load"), Some(env_path));
        assert_eq!(std::env::var("HELMC_SETTINGS_TEST_ONLY").as_deref(), Ok("1"));
    }

    #[test]
    fn test_malformed_dotenv_is_an_error() {
        let temp = tempfile::TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp.path().join(".env"), "NOT VALID LINE\n").expect("write file");

        let err = Settings::load_dotenv(temp.path()).unwrap_err();
        assert!(matches!(err, crate::error::HelmcError::Config(ConfigError::DotEnv { .. })));
    }
}
