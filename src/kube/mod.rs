// ABOUTME: Cluster control-plane access for deploy, status, and cleanup.
// ABOUTME: Exposes the ClusterOps trait and its kubectl-backed implementation.

mod error;
mod kubectl;
mod ops;

pub use error::{ClusterError, ClusterErrorKind};
pub use kubectl::Kubectl;
pub use ops::{ClusterOps, PodRef, ResourceQuery};
