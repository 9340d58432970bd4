// ABOUTME: Test support utilities.
// ABOUTME: Recording in-memory cluster and cloud fakes plus a project fixture.

#![allow(dead_code)]

use async_trait::async_trait;
use kubeploy::cloud::{Certificate, CloudError, CloudOps, LoadBalancer, SecurityGroup};
use kubeploy::config::{Config, PollingConfig};
use kubeploy::kube::{ClusterError, ClusterOps, PodRef, ResourceQuery};
use kubeploy::types::ResourceKind;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tempfile::TempDir;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("kubeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const CONTEXT: &str = "arn:aws:eks:us-east-1:123456789012:cluster/demo";

/// Every call the fake cluster received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentContext,
    ServerVersion,
    Apply(String),
    Get(ResourceKind),
    RolloutStatus,
    RunningPods,
    IngressHostname,
    DeleteNamespace(String),
    DeleteClusterResource(ResourceKind, String),
    TerminatingPods,
}

impl Call {
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Call::Apply(_) | Call::DeleteNamespace(_) | Call::DeleteClusterResource(..)
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct ClusterState {
    calls: Vec<Call>,
    /// (kind, name) pairs. Namespaced objects all live in the one namespace.
    objects: BTreeSet<(ResourceKind, String)>,
    /// (file name, content) of every manifest submitted to apply.
    manifests: Vec<(String, String)>,
}

/// In-memory control plane that records calls and enforces that namespaced
/// objects can only be applied once their namespace exists.
pub struct FakeCluster {
    pub(crate) state: Mutex<ClusterState>,
    pub context: String,
    pub rollout_completes: bool,
    pub running_pods: usize,
    pub ingress_hostname: Option<String>,
    /// Namespace delete is accepted but the namespace never goes away.
    pub namespace_stuck: bool,
    pub terminating: Vec<PodRef>,
    /// Kinds whose apply is accepted but whose objects never show up.
    pub never_observed: Vec<ResourceKind>,
}

impl Default for FakeCluster {
    fn default() -> Self {
        Self {
            state: Mutex::new(ClusterState::default()),
            context: CONTEXT.to_string(),
            rollout_completes: true,
            running_pods: 2,
            ingress_hostname: Some("k8s-nginxdem-nginxdem-0123456789.us-east-1.elb.amazonaws.com".to_string()),
            namespace_stuck: false,
            terminating: Vec::new(),
            never_observed: Vec::new(),
        }
    }
}

impl FakeCluster {
    pub fn with_objects(self, objects: &[(ResourceKind, &str)]) -> Self {
        {
            let mut state = self.state.lock();
            for (kind, name) in objects {
                state.objects.insert((*kind, name.to_string()));
            }
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    /// Manifest file names in the order they were applied.
    pub fn applied(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Apply(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Content of the last manifest applied under `file_name`.
    pub fn applied_content(&self, file_name: &str) -> Option<String> {
        self.state
            .lock()
            .manifests
            .iter()
            .rev()
            .find(|(name, _)| name == file_name)
            .map(|(_, content)| content.clone())
    }

    pub fn has(&self, kind: ResourceKind, name: &str) -> bool {
        self.state.lock().objects.contains(&(kind, name.to_string()))
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }

    fn has_namespace(&self) -> bool {
        self.state
            .lock()
            .objects
            .iter()
            .any(|(kind, _)| *kind == ResourceKind::Namespace)
    }

    fn has_kind(&self, kind: ResourceKind) -> bool {
        self.state.lock().objects.iter().any(|(k, _)| *k == kind)
    }
}

fn not_found(what: &str) -> ClusterError {
    ClusterError::CommandFailed {
        command: format!("kubectl get {what}"),
        stderr: format!("Error from server (NotFound): {what} not found"),
    }
}

fn manifest_kind(kind: &str) -> Option<ResourceKind> {
    match kind {
        "Namespace" => Some(ResourceKind::Namespace),
        "Deployment" => Some(ResourceKind::Deployment),
        "Service" => Some(ResourceKind::Service),
        "Ingress" => Some(ResourceKind::Ingress),
        "HorizontalPodAutoscaler" => Some(ResourceKind::HorizontalPodAutoscaler),
        "ClusterIssuer" => Some(ResourceKind::ClusterIssuer),
        _ => None,
    }
}

#[async_trait]
impl ClusterOps for FakeCluster {
    async fn current_context(&self) -> Result<String, ClusterError> {
        self.record(Call::CurrentContext);
        Ok(self.context.clone())
    }

    async fn server_version(&self) -> Result<String, ClusterError> {
        self.record(Call::ServerVersion);
        Ok("v1.30.2-eks-1552ad0".to_string())
    }

    async fn apply(&self, manifest: &Path) -> Result<(), ClusterError> {
        let file = manifest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.record(Call::Apply(file.clone()));

        let rejected = |stderr: String| ClusterError::CommandFailed {
            command: format!("kubectl apply -f {}", manifest.display()),
            stderr,
        };
        let content = std::fs::read_to_string(manifest).map_err(|e| rejected(e.to_string()))?;
        self.state
            .lock()
            .manifests
            .push((file.clone(), content.clone()));
        let doc: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| rejected(e.to_string()))?;

        let kind = doc["kind"]
            .as_str()
            .and_then(manifest_kind)
            .ok_or_else(|| rejected("unknown kind".to_string()))?;
        let name = doc["metadata"]["name"]
            .as_str()
            .ok_or_else(|| rejected("missing metadata.name".to_string()))?
            .to_string();

        if kind.is_namespaced() && !self.has_namespace() {
            let namespace = doc["metadata"]["namespace"].as_str().unwrap_or("default");
            return Err(rejected(format!(
                "Error from server (NotFound): namespaces \"{namespace}\" not found"
            )));
        }

        if !self.never_observed.contains(&kind) {
            self.state.lock().objects.insert((kind, name));
        }
        Ok(())
    }

    async fn get(&self, query: &ResourceQuery) -> Result<String, ClusterError> {
        self.record(Call::Get(query.kind));

        if query.kind == ResourceKind::Pod {
            if !self.has_namespace() {
                return Err(not_found("namespace"));
            }
            if !self.has_kind(ResourceKind::Deployment) {
                return Ok(String::new());
            }
            return Ok((0..self.running_pods)
                .map(|i| format!("nginx-demo-7d4b9c-{i}   1/1   Running   0   1m\n"))
                .collect());
        }

        match query.name {
            Some(ref name) if self.has(query.kind, name) => Ok(format!("{name}   1m")),
            Some(ref name) => Err(not_found(name)),
            None => Ok(String::new()),
        }
    }

    async fn rollout_status(
        &self,
        _deployment: &str,
        _namespace: &str,
        _timeout: Duration,
    ) -> Result<bool, ClusterError> {
        self.record(Call::RolloutStatus);
        Ok(self.rollout_completes)
    }

    async fn running_pods(&self, _namespace: &str, _selector: &str) -> Result<usize, ClusterError> {
        self.record(Call::RunningPods);
        if self.has_kind(ResourceKind::Deployment) {
            Ok(self.running_pods)
        } else {
            Ok(0)
        }
    }

    async fn ingress_hostname(
        &self,
        name: &str,
        _namespace: &str,
    ) -> Result<Option<String>, ClusterError> {
        self.record(Call::IngressHostname);
        if self.has(ResourceKind::Ingress, name) {
            Ok(self.ingress_hostname.clone())
        } else {
            Err(not_found(name))
        }
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<(), ClusterError> {
        self.record(Call::DeleteNamespace(namespace.to_string()));
        if !self.has(ResourceKind::Namespace, namespace) {
            return Err(not_found(namespace));
        }
        if !self.namespace_stuck {
            self.state
                .lock()
                .objects
                .retain(|(kind, _)| !kind.is_namespaced() && *kind != ResourceKind::Namespace);
        }
        Ok(())
    }

    async fn delete_cluster_resource(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<(), ClusterError> {
        self.record(Call::DeleteClusterResource(kind, name.to_string()));
        if self.state.lock().objects.remove(&(kind, name.to_string())) {
            Ok(())
        } else {
            Err(not_found(name))
        }
    }

    async fn terminating_pods(&self) -> Result<Vec<PodRef>, ClusterError> {
        self.record(Call::TerminatingPods);
        Ok(self.terminating.clone())
    }
}

/// Cloud inventory fake. `unavailable` makes every query fail.
#[derive(Default)]
pub struct FakeCloud {
    pub certificates: Vec<Certificate>,
    pub load_balancers: Vec<LoadBalancer>,
    pub security_groups: Vec<SecurityGroup>,
    pub unavailable: bool,
    pub(crate) queries: Mutex<usize>,
}

impl FakeCloud {
    pub fn queries(&self) -> usize {
        *self.queries.lock()
    }

    fn check(&self) -> Result<(), CloudError> {
        *self.queries.lock() += 1;
        if self.unavailable {
            return Err(CloudError::CommandFailed {
                command: "aws".to_string(),
                stderr: "Unable to locate credentials".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CloudOps for FakeCloud {
    async fn find_certificates(
        &self,
        _region: &str,
        domain_pattern: &str,
    ) -> Result<Vec<Certificate>, CloudError> {
        self.check()?;
        Ok(self
            .certificates
            .iter()
            .filter(|c| c.domain == domain_pattern)
            .cloned()
            .collect())
    }

    async fn find_load_balancers(
        &self,
        _region: &str,
        name_contains: &str,
    ) -> Result<Vec<LoadBalancer>, CloudError> {
        self.check()?;
        Ok(self
            .load_balancers
            .iter()
            .filter(|lb| lb.name.contains(name_contains))
            .cloned()
            .collect())
    }

    async fn find_security_groups(
        &self,
        _region: &str,
        _cluster: Option<&str>,
        name_contains: &str,
    ) -> Result<Vec<SecurityGroup>, CloudError> {
        self.check()?;
        Ok(self
            .security_groups
            .iter()
            .filter(|sg| sg.name.contains(name_contains))
            .cloned()
            .collect())
    }
}

/// A project directory holding a copy of the bundled manifests.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("k8s");
        let target = dir.path().join("k8s");
        std::fs::create_dir_all(&target).unwrap();
        for entry in std::fs::read_dir(&source).unwrap() {
            let path = entry.unwrap().path();
            std::fs::copy(&path, target.join(path.file_name().unwrap())).unwrap();
        }
        Self { dir }
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.dir.path().join("k8s")
    }

    /// Config pinned to the fake context with polling that never sleeps.
    pub fn config(&self) -> Config {
        let mut config = Config::default().anchored(self.dir.path());
        config.cluster.context = Some(CONTEXT.to_string());
        config.polling = PollingConfig::immediate(3);
        config
    }
}

/// Tool lookup that finds everything.
pub fn all_tools(name: &str) -> Option<PathBuf> {
    Some(PathBuf::from("/usr/local/bin").join(name))
}

/// Tool lookup that finds nothing.
pub fn no_tools(_name: &str) -> Option<PathBuf> {
    None
}
