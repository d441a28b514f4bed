//! Planning module for chart installation.
//!
//! This module turns a loaded chart into an ordered list of resources and
//! creates them one by one, stopping at the first failure.

mod executor;
mod plan;

pub use executor::{AppliedResource, ExecutionResult, PlanExecutor};
pub use plan::{DeploymentPlan, PlannedStep};
