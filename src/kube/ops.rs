// ABOUTME: Cluster control-plane capability trait.
// ABOUTME: Apply, get, wait, and delete operations the orchestrators need.

use super::error::ClusterError;
use crate::types::ResourceKind;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Operations against a Kubernetes control plane.
///
/// Mutating calls are `apply`, `delete_namespace` and
/// `delete_cluster_resource`; everything else is read-only.
#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// Name of the context the client is currently bound to.
    async fn current_context(&self) -> Result<String, ClusterError>;

    /// Server version string. Doubles as a reachability probe.
    async fn server_version(&self) -> Result<String, ClusterError>;

    /// Declaratively apply a manifest file (create or update).
    async fn apply(&self, manifest: &Path) -> Result<(), ClusterError>;

    /// Fetch a human-readable listing of the matching resources.
    async fn get(&self, query: &ResourceQuery) -> Result<String, ClusterError>;

    /// Check whether the matching resource exists.
    async fn exists(&self, query: &ResourceQuery) -> Result<bool, ClusterError> {
        match self.get(query).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Block on a deployment's rollout. Returns `false` if `timeout` elapsed first.
    async fn rollout_status(
        &self,
        deployment: &str,
        namespace: &str,
        timeout: Duration,
    ) -> Result<bool, ClusterError>;

    /// Count pods matching `selector` whose phase is `Running`.
    async fn running_pods(&self, namespace: &str, selector: &str)
    -> Result<usize, ClusterError>;

    /// External hostname assigned to an ingress, if any yet.
    async fn ingress_hostname(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<String>, ClusterError>;

    /// Delete a namespace and everything in it, without waiting.
    async fn delete_namespace(&self, namespace: &str) -> Result<(), ClusterError>;

    /// Delete a named cluster-scoped resource.
    async fn delete_cluster_resource(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<(), ClusterError>;

    /// Pods in any namespace that are stuck with a deletion timestamp.
    async fn terminating_pods(&self) -> Result<Vec<PodRef>, ClusterError>;
}

/// Selects resources for `get`/`exists`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    pub kind: ResourceKind,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub selector: Option<String>,
}

impl ResourceQuery {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            name: None,
            namespace: None,
            selector: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// kubectl arguments selecting this resource, starting with the kind.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![self.kind.kubectl_name().to_string()];
        if let Some(ref name) = self.name {
            args.push(name.clone());
        }
        if let Some(ref ns) = self.namespace
            && self.kind.is_namespaced()
        {
            args.push("-n".to_string());
            args.push(ns.clone());
        }
        if let Some(ref selector) = self.selector {
            args.push("-l".to_string());
            args.push(selector.clone());
        }
        args
    }
}

/// A pod identified by namespace and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodRef {
    pub namespace: String,
    pub name: String,
}

impl std::fmt::Display for PodRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
