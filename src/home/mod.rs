//! Home directory management.
//!
//! This module owns the on-disk layout under the home directory: the
//! repository cache, the workspace of installed charts, the bootstrap that
//! creates them, and the advisory lock guarding them.

mod bootstrap;
mod layout;
mod lock;

pub use bootstrap::ensure_home;
pub use layout::{HomeLayout, CACHE_CHARTS_PATH, CACHE_PATH, REQUIRED_DIRS, WORKSPACE_PATH};
pub use lock::{generate_holder_id, HomeLock, LockInfo, LOCK_EXPIRY_SECS};
