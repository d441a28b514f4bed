//! Advisory lock on a home directory.
//!
//! Commands that write to the home (fetching charts, syncing the repository,
//! installing) hold this lock so that two invocations do not race on the
//! workspace or the repository cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ConfigError, HelmcError, Result};

use super::layout::HomeLayout;

/// Lock expiry duration in seconds.
pub const LOCK_EXPIRY_SECS: i64 = 1800; // 30 minutes

/// Information about a home lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Unique lock identifier.
    pub lock_id: String,
    /// Who holds the lock.
    pub holder: String,
    /// When the lock was acquired.
    pub acquired_at: DateTime<Utc>,
    /// When the lock expires.
    pub expires_at: DateTime<Utc>,
}

impl LockInfo {
    /// Creates a new lock info.
    #[must_use]
    pub fn new(holder: &str) -> Self {
        let now = Utc::now();
        Self {
            lock_id: Uuid::new_v4().to_string(),
            holder: holder.to_string(),
            acquired_at: now,
            expires_at: now + chrono::Duration::seconds(LOCK_EXPIRY_SECS),
        }
    }

    /// Checks if the lock has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// A held home lock. Released on [`HomeLock::release`] or drop.
#[derive(Debug)]
pub struct HomeLock {
    /// Lock file path.
    path: PathBuf,
    /// Lock information written to the file.
    info: LockInfo,
    /// Set once the file has been removed.
    released: bool,
}

impl HomeLock {
    /// Acquires the lock of `layout`'s home.
    ///
    /// An expired lock left behind by a crashed invocation is taken over.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HomeLocked`] if another live invocation holds
    /// the lock, or an error if the lock file cannot be written.
    pub async fn acquire(layout: &HomeLayout) -> Result<Self> {
        let path = layout.lock_path();
        let info = LockInfo::new(&generate_holder_id());

        if let Some(existing) = read_lock_file(&path).await? {
            if !existing.is_expired() {
                return Err(ConfigError::HomeLocked {
                    holder: existing.holder,
                    since: existing.acquired_at.to_rfc3339(),
                }
                .into());
            }
            warn!(
                "Taking over expired lock held by {} since {}",
                existing.holder,
                existing.acquired_at.to_rfc3339()
            );
            fs::remove_file(&path).await?;
        }

        write_lock_file(&path, &info).await?;
        info!("Acquired home lock: {}", info.lock_id);

        Ok(Self {
            path,
            info,
            released: false,
        })
    }

    /// The lock information.
    #[must_use]
    pub const fn info(&self) -> &LockInfo {
        &self.info
    }

    /// Releases the lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock file cannot be removed.
    pub async fn release(mut self) -> Result<()> {
        self.released = true;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Released home lock: {}", self.info.lock_id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for HomeLock {
    fn drop(&mut self) {
        if !self.released {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Reads the lock file if it exists.
async fn read_lock_file(path: &Path) -> Result<Option<LockInfo>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let info = serde_json::from_str(&content).map_err(|e| {
        HelmcError::internal(format!(
            "Lock file {} is corrupted ({e}); remove it if no other helmc is running",
            path.display()
        ))
    })?;

    Ok(Some(info))
}

/// Creates the lock file; fails if another process created it first.
async fn write_lock_file(path: &Path, info: &LockInfo) -> Result<()> {
    let content = serde_json::to_string_pretty(info)
        .map_err(|e| HelmcError::internal(format!("Failed to serialize lock: {e}")))?;

    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(ConfigError::HomeLocked {
                holder: String::from("unknown"),
                since: String::from("just now"),
            }
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    file.write_all(content.as_bytes()).await?;
    file.sync_all().await?;
    Ok(())
}

/// Generates a unique holder identifier for the current process.
#[must_use]
pub fn generate_holder_id() -> String {
    let hostname = hostname::get()
        .map_or_else(|_| String::from("unknown"), |h| h.to_string_lossy().to_string());

    let pid = std::process::id();
    let uuid = &Uuid::new_v4().to_string()[..8];

    format!("{hostname}-{pid}-{uuid}")
}
