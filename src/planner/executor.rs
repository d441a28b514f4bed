//! Plan executor.
//!
//! Steps are serialized and handed to the cluster client one at a time, in
//! plan order. The first failure stops the run; nothing after it is
//! attempted and nothing before it is rolled back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, info};

use crate::chart::{document_digest, to_document, ResourceCategory};
use crate::error::DeployError;
use crate::kube::ClusterClient;

use super::plan::{DeploymentPlan, PlannedStep};

/// Executor for deployment plans.
pub struct PlanExecutor<'a> {
    /// Cluster client.
    cluster: &'a dyn ClusterClient,
}

/// A resource the cluster accepted.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedResource {
    /// Resource category.
    pub category: ResourceCategory,
    /// Resource identifier (`Kind/name`).
    pub resource: String,
    /// Hex SHA-256 of the document sent.
    pub digest: String,
}

/// Result of executing a whole plan.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Chart name.
    pub chart: String,
    /// Accepted resources, in order.
    pub applied: Vec<AppliedResource>,
    /// When execution started.
    pub started_at: DateTime<Utc>,
    /// When execution finished.
    pub finished_at: DateTime<Utc>,
}

impl fmt::Debug for PlanExecutor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanExecutor")
            .field("cluster", &self.cluster.client_name())
            .finish()
    }
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub const fn new(cluster: &'a dyn ClusterClient) -> Self {
        Self { cluster }
    }

    /// Executes a deployment plan.
    ///
    /// # Errors
    ///
    /// Returns a [`DeployError`] naming the first resource that could not be
    /// serialized or was rejected, together with every resource accepted
    /// before it.
    pub async fn execute(&self, plan: &DeploymentPlan<'_>) -> Result<ExecutionResult, DeployError> {
        info!(
            "Installing {} resources from {} via {}",
            plan.step_count(),
            plan.chart,
            self.cluster.client_name()
        );

        let started_at = Utc::now();
        let mut applied: Vec<AppliedResource> = Vec::with_capacity(plan.step_count());

        for step in &plan.steps {
            match self.execute_step(step, &plan.api_version).await {
                Ok(resource) => applied.push(resource),
                Err(e) => {
                    error!("Stopping after {} of {} resources", applied.len(), plan.step_count());
                    return Err(e.with_applied(applied.into_iter().map(|a| a.resource).collect()));
                }
            }
        }

        info!("Installed {} resources from {}", applied.len(), plan.chart);

        Ok(ExecutionResult {
            chart: plan.chart.clone(),
            applied,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Serializes and creates a single resource.
    async fn execute_step(
        &self,
        step: &PlannedStep<'_>,
        api_version: &str,
    ) -> Result<AppliedResource, DeployError> {
        let document = to_document(step.manifest, api_version).map_err(|source| {
            DeployError::Serialize {
                resource: step.resource.clone(),
                applied: Vec::new(),
                source,
            }
        })?;
        let digest = document_digest(&document);

        info!("Creating {} {} ({})", step.category.kind(), step.resource, &digest[..12]);
        if step.category.is_sensitive() {
            debug!("Document for {} withheld, sha256 {digest}", step.resource);
        } else {
            debug!("Document for {}: {}", step.resource, String::from_utf8_lossy(&document));
        }

        self.cluster
            .create(&document)
            .await
            .map_err(|source| DeployError::Apply {
                resource: step.resource.clone(),
                applied: Vec::new(),
                source,
            })?;

        Ok(AppliedResource {
            category: step.category,
            resource: step.resource.clone(),
            digest,
        })
    }
}

impl ExecutionResult {
    /// Number of resources created.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    /// Number of resources created in `category`.
    #[must_use]
    pub fn count(&self, category: ResourceCategory) -> usize {
        self.applied.iter().filter(|a| a.category == category).count()
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} resources created", self.chart, self.applied.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Chart, Chartfile, Manifest};
    use crate::testing::RecordingCluster;
    use serde_yaml::{Mapping, Value};

    fn manifest(kind: &str, name: &str) -> Manifest {
        let yaml = format!("kind: {kind}\nmetadata:\n  name: {name}\n");
        let object: Mapping = serde_yaml::from_str(&yaml).expect("valid yaml");
        Manifest::new(format!("manifests/{name}.yaml"), object)
    }

    fn sample_chart() -> Chart {
        let mut chart = Chart::new("web", "/tmp/web", Chartfile::default());
        chart.push(ResourceCategory::Pod, manifest("Pod", "web-0"));
        chart.push(ResourceCategory::Service, manifest("Service", "web"));
        chart.push(ResourceCategory::Namespace, manifest("Namespace", "web"));
        chart.push(ResourceCategory::ReplicationController, manifest("ReplicationController", "web"));
        chart.push(ResourceCategory::Secret, manifest("Secret", "web-creds"));
        chart.push(ResourceCategory::PersistentVolume, manifest("PersistentVolume", "web-data"));
        chart
    }

    #[tokio::test]
    async fn test_resources_created_in_category_order() {
        let chart = sample_chart();
        let plan = DeploymentPlan::from_chart(&chart, "v1");
        let cluster = RecordingCluster::new();

        let result = PlanExecutor::new(&cluster).execute(&plan).await.expect("execute");

        assert_eq!(
            cluster.applied_ids(),
            [
                "Namespace/web",
                "Secret/web-creds",
                "PersistentVolume/web-data",
                "Service/web",
                "Pod/web-0",
                "ReplicationController/web",
            ]
        );
        assert_eq!(result.applied_count(), 6);
        assert_eq!(result.count(ResourceCategory::Secret), 1);
        assert!(cluster
            .applied_documents()
            .iter()
            .all(|doc| doc["apiVersion"] == "v1"));
    }

    #[tokio::test]
    async fn test_stops_at_first_rejected_resource() {
        let chart = sample_chart();
        let plan = DeploymentPlan::from_chart(&chart, "v1");
        let cluster = RecordingCluster::failing_at(3);

        let err = PlanExecutor::new(&cluster).execute(&plan).await.unwrap_err();

        assert_eq!(cluster.attempts(), 3);
        assert_eq!(err.resource(), "PersistentVolume/web-data");
        assert_eq!(err.applied(), ["Namespace/web", "Secret/web-creds"]);
        assert!(matches!(err, DeployError::Apply { .. }));
    }

    #[tokio::test]
    async fn test_serialize_failure_skips_cluster() {
        let mut chart = Chart::new("bad", "/tmp/bad", Chartfile::default());
        chart.push(ResourceCategory::Namespace, manifest("Namespace", "bad"));
        let mut object = Mapping::new();
        object.insert(Value::String("kind".into()), Value::String("Service".into()));
        object.insert(Value::Sequence(vec![]), Value::Null);
        chart.push(ResourceCategory::Service, Manifest::new("manifests/svc.yaml", object));
        chart.push(ResourceCategory::Pod, manifest("Pod", "never"));

        let plan = DeploymentPlan::from_chart(&chart, "v1");
        let cluster = RecordingCluster::new();

        let err = PlanExecutor::new(&cluster).execute(&plan).await.unwrap_err();

        assert!(matches!(err, DeployError::Serialize { .. }));
        assert_eq!(err.resource(), "Service/<unnamed>");
        assert_eq!(err.applied(), ["Namespace/bad"]);
        assert_eq!(cluster.attempts(), 1);
    }

    #[tokio::test]
    async fn test_empty_plan_succeeds_without_calls() {
        let chart = Chart::new("empty", "/tmp/empty", Chartfile::default());
        let plan = DeploymentPlan::from_chart(&chart, "v1");
        let cluster = RecordingCluster::new();

        let result = PlanExecutor::new(&cluster).execute(&plan).await.expect("execute");

        assert_eq!(result.to_string(), "empty: 0 resources created");
        assert_eq!(cluster.attempts(), 0);
    }
}
