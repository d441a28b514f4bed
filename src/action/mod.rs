//! Top-level workflows behind each command.
//!
//! Every workflow takes its paths from a [`HomeLayout`](crate::home::HomeLayout)
//! and its external programs through the client traits, so none of them
//! depends on the process working directory.

mod fetch;
mod install;
mod list;
mod update;

pub use fetch::{FetchReport, Fetcher};
pub use install::{InstallReport, Installer};
pub use list::{list_charts, ChartSummary};
pub use update::{UpdateReport, Updater};
