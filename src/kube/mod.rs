//! Cluster applier.
//!
//! Resources reach the cluster through a [`ClusterClient`]; the production
//! implementation pipes each document into `kubectl create -f -`.

mod client;
mod kubectl;

pub use client::ClusterClient;
pub use kubectl::{KubectlClient, DEFAULT_KUBECTL};
