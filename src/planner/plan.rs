//! Deployment plan construction.
//!
//! A plan is the flat list of resources a chart installs, in the fixed order
//! Namespaces, Secrets, PersistentVolumes, Services, Pods,
//! ReplicationControllers. Within a category, manifests keep the order the
//! loader produced.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::chart::{Chart, Manifest, ResourceCategory};

/// An ordered deployment plan for one chart.
#[derive(Debug)]
pub struct DeploymentPlan<'a> {
    /// Chart name.
    pub chart: String,
    /// When the plan was created.
    pub created_at: DateTime<Utc>,
    /// `apiVersion` stamped on every document.
    pub api_version: String,
    /// Steps in execution order.
    pub steps: Vec<PlannedStep<'a>>,
}

/// A single resource to create.
#[derive(Debug, Clone)]
pub struct PlannedStep<'a> {
    /// Position in the plan, starting at 1.
    pub index: usize,
    /// Resource category.
    pub category: ResourceCategory,
    /// Resource identifier (`Kind/name`).
    pub resource: String,
    /// The manifest to serialize.
    pub manifest: &'a Manifest,
}

impl<'a> DeploymentPlan<'a> {
    /// Builds the plan for `chart`.
    #[must_use]
    pub fn from_chart(chart: &'a Chart, api_version: &str) -> Self {
        let steps = chart
            .manifests()
            .enumerate()
            .map(|(i, (category, manifest))| PlannedStep {
                index: i + 1,
                category,
                resource: manifest.id(),
                manifest,
            })
            .collect();

        Self {
            chart: chart.name.clone(),
            created_at: Utc::now(),
            api_version: api_version.to_string(),
            steps,
        }
    }

    /// Returns true if there is nothing to create.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Number of steps in `category`.
    #[must_use]
    pub fn count(&self, category: ResourceCategory) -> usize {
        self.steps.iter().filter(|s| s.category == category).count()
    }
}

impl fmt::Display for PlannedStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "create {} ({})", self.resource, self.manifest.source().display())
    }
}

impl fmt::Display for DeploymentPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "Chart {} has no resources to install", self.chart);
        }

        writeln!(f, "Deployment Plan for {} ({} resources):", self.chart, self.steps.len())?;
        for step in &self.steps {
            writeln!(f, "  {}. {step}", step.index)?;
        }

        Ok(())
    }
}
