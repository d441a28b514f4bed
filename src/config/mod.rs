//! Configuration module.
//!
//! This module resolves runtime settings (home directory, repository,
//! external programs) and checks that required programs are installed.

mod prereq;
mod settings;

pub use prereq::Prerequisites;
pub use settings::{
    absolute_home, default_home, Settings, DEFAULT_HOME_DIR, DEFAULT_REPO, GIT_PROGRAM_ENV,
    KUBECTL_PROGRAM_ENV,
};
