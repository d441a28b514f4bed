//! Chart module.
//!
//! This module covers everything about a chart once it is on disk:
//! - Loading `Chart.yaml` and the manifests under `manifests/`
//! - Sorting manifests into the six installable resource categories
//! - Validating the result
//! - Serializing individual manifests for the cluster client

mod chartfile;
mod loader;
mod model;
mod serializer;
mod validator;

pub use chartfile::Chartfile;
pub use loader::{ChartLoader, CHART_FILE, MANIFESTS_DIR};
pub use model::{Chart, Manifest, ResourceCategory};
pub use serializer::{document_digest, to_document, DEFAULT_API_VERSION};
pub use validator::{validate_chart_name, ChartValidator, ValidationResult};
