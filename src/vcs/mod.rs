//! Repository sync.
//!
//! The chart repository is cached as a working copy managed through a
//! [`VcsClient`]; the production implementation shells out to `git`.

mod client;
mod git;
mod sync;

pub use client::VcsClient;
pub use git::{GitClient, DEFAULT_GIT};
pub use sync::{RepositorySync, SyncOutcome};
