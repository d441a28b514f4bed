//! In-memory chart model.
//!
//! A chart holds one ordered sequence of manifests per resource category.
//! The category of a manifest is the sequence it lives in; it is decided once,
//! when the chart is loaded.

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::{Path, PathBuf};

use super::chartfile::Chartfile;

/// Resource categories, in the order they are applied to the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceCategory {
    /// `Namespace` objects.
    Namespace,
    /// `Secret` objects.
    Secret,
    /// `PersistentVolume` objects.
    PersistentVolume,
    /// `Service` objects.
    Service,
    /// `Pod` objects.
    Pod,
    /// `ReplicationController` objects.
    ReplicationController,
}

impl ResourceCategory {
    /// All categories in application order.
    pub const APPLY_ORDER: [Self; 6] = [
        Self::Namespace,
        Self::Secret,
        Self::PersistentVolume,
        Self::Service,
        Self::Pod,
        Self::ReplicationController,
    ];

    /// Maps a manifest `kind` to its category.
    #[must_use]
    pub fn from_kind(kind: &str) -> Option<Self> {
        Self::APPLY_ORDER.into_iter().find(|c| c.kind() == kind)
    }

    /// The manifest `kind` for this category.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Namespace => "Namespace",
            Self::Secret => "Secret",
            Self::PersistentVolume => "PersistentVolume",
            Self::Service => "Service",
            Self::Pod => "Pod",
            Self::ReplicationController => "ReplicationController",
        }
    }

    /// Plural label used in logs and output.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Namespace => "Namespaces",
            Self::Secret => "Secrets",
            Self::PersistentVolume => "PersistentVolumes",
            Self::Service => "Services",
            Self::Pod => "Pods",
            Self::ReplicationController => "ReplicationControllers",
        }
    }

    /// Whether payloads of this category must stay out of the logs.
    #[must_use]
    pub const fn is_sensitive(self) -> bool {
        matches!(self, Self::Secret)
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// One resource definition read from a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// File the definition was read from.
    source: PathBuf,
    /// The definition itself, keys in file order.
    object: Mapping,
}

impl Manifest {
    /// Wraps a parsed mapping.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, object: Mapping) -> Self {
        Self {
            source: source.into(),
            object,
        }
    }

    /// File the definition was read from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The raw definition.
    #[must_use]
    pub const fn object(&self) -> &Mapping {
        &self.object
    }

    /// The `kind` field, if present.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.object.get("kind").and_then(Value::as_str)
    }

    /// The `metadata.name` field, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    /// The `metadata.generateName` prefix, if present.
    #[must_use]
    pub fn generate_name(&self) -> Option<&str> {
        self.metadata_str("generateName")
    }

    /// The `metadata.namespace` field, if present.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.object
            .get("metadata")
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
    }

    /// `Kind/name` identifier used in logs and errors.
    ///
    /// Resources named by the server show their `generateName` prefix.
    #[must_use]
    pub fn id(&self) -> String {
        let name = match (self.name(), self.generate_name()) {
            (Some(name), _) if !name.is_empty() => name.to_string(),
            (_, Some(prefix)) if !prefix.is_empty() => format!("{prefix}*"),
            _ => String::from("<unnamed>"),
        };
        format!("{}/{name}", self.kind().unwrap_or("<unknown>"))
    }
}

/// A chart loaded from the workspace.
#[derive(Debug, Clone)]
pub struct Chart {
    /// Workspace directory name.
    pub name: String,
    /// Chart directory on disk.
    pub path: PathBuf,
    /// Parsed `Chart.yaml`.
    pub chartfile: Chartfile,
    /// Namespace manifests.
    pub namespaces: Vec<Manifest>,
    /// Secret manifests.
    pub secrets: Vec<Manifest>,
    /// PersistentVolume manifests.
    pub persistent_volumes: Vec<Manifest>,
    /// Service manifests.
    pub services: Vec<Manifest>,
    /// Pod manifests.
    pub pods: Vec<Manifest>,
    /// ReplicationController manifests.
    pub replication_controllers: Vec<Manifest>,
    /// `Kind/name` of manifests whose kind helmc does not install.
    pub unsupported: Vec<String>,
}

impl Chart {
    /// Creates an empty chart.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, chartfile: Chartfile) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            chartfile,
            namespaces: Vec::new(),
            secrets: Vec::new(),
            persistent_volumes: Vec::new(),
            services: Vec::new(),
            pods: Vec::new(),
            replication_controllers: Vec::new(),
            unsupported: Vec::new(),
        }
    }

    /// The sequence holding `category`.
    #[must_use]
    pub fn sequence(&self, category: ResourceCategory) -> &[Manifest] {
        match category {
            ResourceCategory::Namespace => &self.namespaces,
            ResourceCategory::Secret => &self.secrets,
            ResourceCategory::PersistentVolume => &self.persistent_volumes,
            ResourceCategory::Service => &self.services,
            ResourceCategory::Pod => &self.pods,
            ResourceCategory::ReplicationController => &self.replication_controllers,
        }
    }

    fn sequence_mut(&mut self, category: ResourceCategory) -> &mut Vec<Manifest> {
        match category {
            ResourceCategory::Namespace => &mut self.namespaces,
            ResourceCategory::Secret => &mut self.secrets,
            ResourceCategory::PersistentVolume => &mut self.persistent_volumes,
            ResourceCategory::Service => &mut self.services,
            ResourceCategory::Pod => &mut self.pods,
            ResourceCategory::ReplicationController => &mut self.replication_controllers,
        }
    }

    /// Appends a manifest to the end of its category's sequence.
    pub fn push(&mut self, category: ResourceCategory, manifest: Manifest) {
        self.sequence_mut(category).push(manifest);
    }

    /// Iterates over every manifest with its category, in application order.
    pub fn manifests(&self) -> impl Iterator<Item = (ResourceCategory, &Manifest)> + '_ {
        ResourceCategory::APPLY_ORDER
            .into_iter()
            .flat_map(move |c| self.sequence(c).iter().map(move |m| (c, m)))
    }

    /// Total number of installable manifests.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        ResourceCategory::APPLY_ORDER
            .into_iter()
            .map(|c| self.sequence(c).len())
            .sum()
    }

    /// Returns true if the chart has nothing to install.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resource_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(kind: &str, name: &str) -> Manifest {
        let yaml = format!("kind: {kind}\nmetadata:\n  name: {name}\n");
        let object: Mapping = serde_yaml::from_str(&yaml).expect("valid yaml");
        Manifest::new("manifests/test.yaml", object)
    }

    #[test]
    fn test_category_from_kind() {
        assert_eq!(
            ResourceCategory::from_kind("ReplicationController"),
            Some(ResourceCategory::ReplicationController)
        );
        assert_eq!(ResourceCategory::from_kind("Deployment"), None);
        assert_eq!(ResourceCategory::from_kind("pod"), None);
    }

    #[test]
    fn test_manifest_identity() {
        let m = manifest("Service", "frontend");
        assert_eq!(m.kind(), Some("Service"));
        assert_eq!(m.name(), Some("frontend"));
        assert_eq!(m.id(), "Service/frontend");
        assert_eq!(m.namespace(), None);
    }

    #[test]
    fn test_generated_name_identity() {
        let object: Mapping =
            serde_yaml::from_str("kind: Pod\nmetadata:\n  generateName: job-\n  namespace: batch\n")
                .expect("valid yaml");
        let m = Manifest::new("manifests/job.yaml", object);

        assert_eq!(m.name(), None);
        assert_eq!(m.generate_name(), Some("job-"));
        assert_eq!(m.namespace(), Some("batch"));
        assert_eq!(m.id(), "Pod/job-*");
    }

    #[test]
    fn test_manifests_iterate_in_apply_order() {
        let mut chart = Chart::new("demo", "/tmp/demo", Chartfile::default());
        chart.push(ResourceCategory::Pod, manifest("Pod", "p1"));
        chart.push(ResourceCategory::Namespace, manifest("Namespace", "ns"));
        chart.push(ResourceCategory::Pod, manifest("Pod", "p0"));
        chart.push(ResourceCategory::Secret, manifest("Secret", "s"));

        let ids: Vec<String> = chart.manifests().map(|(_, m)| m.id()).collect();
        assert_eq!(ids, ["Namespace/ns", "Secret/s", "Pod/p1", "Pod/p0"]);
        assert_eq!(chart.resource_count(), 4);
        assert!(!chart.is_empty());
    }
}
