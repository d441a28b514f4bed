//! Home directory bootstrap.

use std::io::ErrorKind;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::layout::HomeLayout;

/// Ensures the home directory and its required subdirectories exist.
///
/// A missing home is created along with every required subdirectory; an
/// existing home gets any subdirectory it lacks. The process working
/// directory is left untouched.
///
/// # Errors
///
/// Returns [`ConfigError::HomeNotDirectory`] without creating anything if the
/// home path exists but is not a directory, or an error if a directory cannot
/// be created.
pub async fn ensure_home(layout: &HomeLayout) -> Result<()> {
    let root = layout.root();

    match fs::metadata(root).await {
        Ok(meta) if !meta.is_dir() => {
            return Err(ConfigError::HomeNotDirectory {
                path: root.to_path_buf(),
            }
            .into());
        }
        Ok(_) => debug!("Home directory exists: {}", root.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => info!("Creating {}", root.display()),
        Err(e) => {
            return Err(ConfigError::InvalidHome {
                path: root.to_path_buf(),
                message: e.to_string(),
            }
            .into());
        }
    }

    for dir in layout.required_dirs() {
        if fs::metadata(&dir).await.is_ok_and(|m| m.is_dir()) {
            continue;
        }
        debug!("Creating directory: {}", dir.display());
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ConfigError::InvalidHome {
                path: dir.clone(),
                message: format!("could not create directory: {e}"),
            })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HelmcError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fresh_home_gets_all_directories() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path().join("nested").join("home"));

        ensure_home(&layout).await.expect("bootstrap");

        assert!(layout.root().is_dir());
        for dir in layout.required_dirs() {
            assert!(dir.is_dir(), "{} missing", dir.display());
        }
    }

    #[tokio::test]
    async fn test_existing_home_is_completed() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = HomeLayout::new(temp.path());
        std::fs::create_dir(layout.workspace_dir()).expect("create dir");
        std::fs::write(layout.workspace_dir().join("keep"), "x").expect("write file");

        ensure_home(&layout).await.expect("bootstrap");

        assert!(layout.root().join("cache").is_dir());
        assert!(layout.workspace_dir().join("keep").is_file());
    }

    #[tokio::test]
    async fn test_home_that_is_a_file_fails_and_creates_nothing() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let home = temp.path().join("home");
        std::fs::write(&home, "not a directory").expect("write file");
        let layout = HomeLayout::new(&home);

        let err = ensure_home(&layout).await.unwrap_err();

        assert!(matches!(
            err,
            HelmcError::Config(ConfigError::HomeNotDirectory { .. })
        ));
        assert!(home.is_file());
        let entries = std::fs::read_dir(temp.path()).expect("read dir").count();
        assert_eq!(entries, 1);
    }
}
