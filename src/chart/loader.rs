//! Chart loader.
//!
//! Reads `Chart.yaml` and every manifest file under `manifests/`, sorting each
//! document into the sequence of its resource category.

use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ChartError, Result};

use super::chartfile::Chartfile;
use super::model::{Chart, Manifest, ResourceCategory};

/// Name of the chart metadata file.
pub const CHART_FILE: &str = "Chart.yaml";

/// Directory holding a chart's manifests.
pub const MANIFESTS_DIR: &str = "manifests";

/// Manifest file extensions, without the dot.
const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Loader for charts stored on disk.
#[derive(Debug, Default)]
pub struct ChartLoader;

impl ChartLoader {
    /// Creates a new chart loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads the chart stored in `dir`.
    ///
    /// Manifest files are read in file-name order and documents in file
    /// order, so each category keeps the order it has on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if `Chart.yaml` is missing or unparseable, or if a
    /// manifest is not a mapping with a `kind`.
    pub fn load(&self, dir: impl AsRef<Path>) -> Result<Chart> {
        let dir = dir.as_ref();
        info!("Loading chart from: {}", dir.display());

        let chartfile = Self::load_chartfile(&dir.join(CHART_FILE))?;
        let name = dir
            .file_name()
            .map_or_else(|| chartfile.name.clone(), |n| n.to_string_lossy().to_string());

        let mut chart = Chart::new(name, dir, chartfile);

        for file in Self::manifest_files(&dir.join(MANIFESTS_DIR))? {
            let content = std::fs::read_to_string(&file).map_err(|e| ChartError::ReadFailed {
                path: file.clone(),
                message: e.to_string(),
            })?;
            self.parse_manifests(&content, &file, &mut chart)?;
        }

        debug!(
            "Loaded chart {} with {} resources ({} unsupported)",
            chart.name,
            chart.resource_count(),
            chart.unsupported.len()
        );
        Ok(chart)
    }

    /// Reads and parses a `Chart.yaml` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not valid chart metadata.
    pub fn load_chartfile(path: &Path) -> Result<Chartfile> {
        if !path.is_file() {
            return Err(ChartError::ChartfileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ChartError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let chartfile = serde_yaml::from_str(&content).map_err(|e| ChartError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(chartfile)
    }

    /// Parses every YAML document in `content` into `chart`.
    ///
    /// Empty documents are ignored. Kinds outside the six installable
    /// categories are recorded in [`Chart::unsupported`] and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a document is not valid YAML, is not a mapping,
    /// or has no `kind`.
    pub fn parse_manifests(&self, content: &str, source: &Path, chart: &mut Chart) -> Result<()> {
        for document in serde_yaml::Deserializer::from_str(content) {
            let value = Value::deserialize(document).map_err(|e| ChartError::ParseError {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;

            let object = match value {
                Value::Null => continue,
                Value::Mapping(object) => object,
                other => {
                    return Err(ChartError::invalid_manifest(
                        source,
                        format!("expected a mapping, found {}", value_type(&other)),
                    )
                    .into());
                }
            };

            let manifest = Manifest::new(source, object);
            let category = match manifest.kind() {
                Some(kind) => ResourceCategory::from_kind(kind),
                None => {
                    return Err(ChartError::invalid_manifest(source, "missing 'kind'").into());
                }
            };

            match category {
                Some(category) => {
                    debug!("Found {} in {}", manifest.id(), source.display());
                    chart.push(category, manifest);
                }
                None => {
                    warn!(
                        "Skipping {} in {}: kind is not installable",
                        manifest.id(),
                        source.display()
                    );
                    chart.unsupported.push(manifest.id());
                }
            }
        }

        Ok(())
    }

    /// Lists manifest files in `dir`, sorted by file name.
    fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            debug!("No manifests directory at: {}", dir.display());
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ChartError::ReadFailed {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ChartError::ReadFailed {
                    path: dir.to_path_buf(),
                    message: e.to_string(),
                })?
                .path();

            let is_manifest = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| MANIFEST_EXTENSIONS.contains(&e));

            if path.is_file() && is_manifest {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Human name for a YAML value's type.
const fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, content).expect("write file");
    }

    fn chart_dir() -> TempDir {
        let temp = TempDir::new().expect("Failed to create temp dir");
        write(temp.path(), CHART_FILE, "name: demo\nversion: 0.2.0\n");
        temp
    }

    #[test]
    fn test_load_sorts_by_category_and_keeps_order() {
        let temp = chart_dir();
        write(
            temp.path(),
            "manifests/b-app.yaml",
            r"
kind: Pod
metadata:
  name: web-0
---
kind: Service
metadata:
  name: web
---
kind: Pod
metadata:
  name: web-1
",
        );
        write(
            temp.path(),
            "manifests/a-base.yml",
            "kind: Namespace\nmetadata:\n  name: demo\n",
        );
        write(temp.path(), "manifests/README.md", "not a manifest");

        let chart = ChartLoader::new().load(temp.path()).expect("chart loads");

        assert_eq!(chart.chartfile.name, "demo");
        assert_eq!(chart.namespaces.len(), 1);
        assert_eq!(chart.services.len(), 1);
        let pods: Vec<String> = chart.pods.iter().map(Manifest::id).collect();
        assert_eq!(pods, ["Pod/web-0", "Pod/web-1"]);
        assert_eq!(chart.resource_count(), 4);
    }

    #[test]
    fn test_load_without_chartfile_fails() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let err = ChartLoader::new().load(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::HelmcError::Chart(ChartError::ChartfileNotFound { .. })
        ));
    }

    #[test]
    fn test_unsupported_kinds_are_skipped() {
        let temp = chart_dir();
        write(
            temp.path(),
            "manifests/mixed.yaml",
            "kind: ConfigMap\nmetadata:\n  name: settings\n---\nkind: Secret\nmetadata:\n  name: creds\n",
        );

        let chart = ChartLoader::new().load(temp.path()).expect("chart loads");
        assert_eq!(chart.secrets.len(), 1);
        assert_eq!(chart.unsupported, ["ConfigMap/settings"]);
    }

    #[test]
    fn test_manifest_without_kind_is_rejected() {
        let temp = chart_dir();
        write(temp.path(), "manifests/bad.yaml", "metadata:\n  name: nothing\n");

        let err = ChartLoader::new().load(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::HelmcError::Chart(ChartError::InvalidManifest { .. })
        ));
    }

    #[test]
    fn test_non_mapping_document_is_rejected() {
        let temp = chart_dir();
        write(temp.path(), "manifests/list.yaml", "- kind: Pod\n");

        let err = ChartLoader::new().load(temp.path()).unwrap_err();
        assert!(err.to_string().contains("expected a mapping, found a sequence"));
    }

    #[test]
    fn test_missing_manifests_dir_gives_empty_chart() {
        let temp = chart_dir();
        let chart = ChartLoader::new().load(temp.path()).expect("chart loads");
        assert!(chart.is_empty());
    }
}
