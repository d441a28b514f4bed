// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # helmc
//!
//! A minimal chart deployment client for Kubernetes.
//!
//! ## Overview
//!
//! A chart is a directory holding a `Chart.yaml` and a `manifests/` folder of
//! Kubernetes manifests. helmc keeps a local clone of a chart repository,
//! copies charts from it into a workspace, and installs them by piping one
//! JSON document per resource into `kubectl create -f -`.
//!
//! ## Installation order
//!
//! Resources are created one at a time, grouped by kind:
//!
//! 1. Namespaces
//! 2. Secrets
//! 3. PersistentVolumes
//! 4. Services
//! 5. Pods
//! 6. ReplicationControllers
//!
//! The first failure stops the install; resources already created stay.
//!
//! ## Modules
//!
//! - [`chart`]: Chart loading, validation, and serialization
//! - [`planner`]: Ordered installation plans and their execution
//! - [`kube`]: Cluster client (`kubectl`)
//! - [`vcs`]: Repository client (`git`) and sync
//! - [`home`]: Home directory layout, bootstrap, and lock
//! - [`config`]: Settings and prerequisite checks
//! - [`action`]: The install, update, fetch, and list workflows
//! - [`cli`]: Command-line interface
//!
//! ## Home layout
//!
//! ```text
//! ~/.helmc/
//!   cache/charts/        clone of the chart repository
//!   workspace/redis/     an installed chart
//!     Chart.yaml
//!     manifests/
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod action;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod home;
pub mod kube;
pub mod planner;
pub mod vcs;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use action::{Fetcher, InstallReport, Installer, Updater};
pub use chart::{Chart, ChartLoader, ChartValidator, Manifest, ResourceCategory};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{Prerequisites, Settings};
pub use error::{HelmcError, Result};
pub use home::{HomeLayout, HomeLock};
pub use kube::{ClusterClient, KubectlClient};
pub use planner::{DeploymentPlan, ExecutionResult, PlanExecutor};
pub use vcs::{GitClient, RepositorySync, VcsClient};
