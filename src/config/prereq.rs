//! External program prerequisites.

use std::path::PathBuf;
use tracing::debug;

use crate::error::{ConfigError, Result};

/// External programs a command needs on `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prerequisites {
    /// Program names or paths.
    programs: Vec<String>,
}

impl Prerequisites {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { programs: Vec::new() }
    }

    /// Adds a program.
    #[must_use]
    pub fn require(mut self, program: impl Into<String>) -> Self {
        self.programs.push(program.into());
        self
    }

    /// Program names in the order they are checked.
    #[must_use]
    pub fn programs(&self) -> &[String] {
        &self.programs
    }

    /// Resolves every program, stopping at the first one that is missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingExecutable`] naming the missing program.
    pub fn ensure(&self) -> Result<Vec<PathBuf>> {
        self.programs
            .iter()
            .map(|program| {
                let path = which::which(program).map_err(|e| ConfigError::MissingExecutable {
                    program: program.clone(),
                    message: e.to_string(),
                })?;
                debug!("Found {} at {}", program, path.display());
                Ok(path)
            })
            .collect()
    }
}
