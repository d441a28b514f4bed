//! `Chart.yaml` metadata.

use serde::{Deserialize, Serialize};

/// Chart metadata read from `Chart.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chartfile {
    /// Chart name.
    #[serde(default)]
    pub name: String,
    /// Chart version.
    #[serde(default)]
    pub version: String,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// Project home page.
    #[serde(default)]
    pub home: Option<String>,
    /// Source locations.
    #[serde(default)]
    pub source: Vec<String>,
    /// Maintainers, usually `Name <email>`.
    #[serde(default)]
    pub maintainers: Vec<String>,
    /// Long-form details.
    #[serde(default)]
    pub details: Option<String>,
}
