// ABOUTME: ClusterOps implementation that shells out to kubectl.
// ABOUTME: Parses kubectl JSON and jsonpath output into typed results.

use super::error::{ClusterError, CommandFailedSnafu, DecodeSnafu, MissingFieldSnafu, SpawnSnafu};
use super::ops::{ClusterOps, PodRef, ResourceQuery};
use crate::exec;
use crate::types::ResourceKind;
use async_trait::async_trait;
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};
use std::path::Path;
use std::time::Duration;

/// Talks to the cluster through the `kubectl` binary.
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: String,
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

impl Kubectl {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run kubectl and return stdout, failing on non-zero exit.
    async fn run(&self, args: &[&str]) -> Result<String, ClusterError> {
        let output = exec::run(&self.program, args).await.context(SpawnSnafu {
            program: self.program.clone(),
        })?;

        if !output.success() {
            return CommandFailedSnafu {
                command: self.describe(args),
                stderr: output.stderr.trim().to_string(),
            }
            .fail();
        }

        Ok(output.stdout)
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }
}

#[async_trait]
impl ClusterOps for Kubectl {
    async fn current_context(&self) -> Result<String, ClusterError> {
        let stdout = self.run(&["config", "current-context"]).await?;
        Ok(stdout.trim().to_string())
    }

    async fn server_version(&self) -> Result<String, ClusterError> {
        let args = ["version", "-o", "json"];
        let stdout = self.run(&args).await?;
        parse_server_version(&stdout, &self.describe(&args))
    }

    async fn apply(&self, manifest: &Path) -> Result<(), ClusterError> {
        let path = manifest.to_string_lossy();
        let stdout = self.run(&["apply", "-f", &path]).await?;
        for line in stdout.lines() {
            tracing::info!("{}", line);
        }
        Ok(())
    }

    async fn get(&self, query: &ResourceQuery) -> Result<String, ClusterError> {
        let mut args = vec!["get".to_string()];
        args.extend(query.to_args());
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args).await
    }

    async fn rollout_status(
        &self,
        deployment: &str,
        namespace: &str,
        timeout: Duration,
    ) -> Result<bool, ClusterError> {
        let target = format!("deployment/{deployment}");
        let timeout = timeout_arg(timeout);
        match self
            .run(&["rollout", "status", &target, "-n", namespace, &timeout])
            .await
        {
            Ok(_) => Ok(true),
            Err(ClusterError::CommandFailed { stderr, .. }) if stderr.contains("timed out") => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn running_pods(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<usize, ClusterError> {
        let args = ["get", "pods", "-n", namespace, "-l", selector, "-o", "json"];
        let stdout = self.run(&args).await?;
        let list: PodList = serde_json::from_str(&stdout).context(DecodeSnafu {
            command: self.describe(&args),
        })?;
        Ok(list.running_count())
    }

    async fn ingress_hostname(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<String>, ClusterError> {
        let stdout = self
            .run(&[
                "get",
                "ingress",
                name,
                "-n",
                namespace,
                "-o",
                "jsonpath={.status.loadBalancer.ingress[0].hostname}",
            ])
            .await?;
        let hostname = stdout.trim();
        Ok((!hostname.is_empty()).then(|| hostname.to_string()))
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<(), ClusterError> {
        self.run(&["delete", "namespace", namespace, "--wait=false"])
            .await?;
        Ok(())
    }

    async fn delete_cluster_resource(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<(), ClusterError> {
        self.run(&["delete", kind.kubectl_name(), name]).await?;
        Ok(())
    }

    async fn terminating_pods(&self) -> Result<Vec<PodRef>, ClusterError> {
        let args = ["get", "pods", "--all-namespaces", "-o", "json"];
        let stdout = self.run(&args).await?;
        let list: PodList = serde_json::from_str(&stdout).context(DecodeSnafu {
            command: self.describe(&args),
        })?;
        Ok(list.terminating())
    }
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(rename = "serverVersion")]
    server_version: Option<ServerVersion>,
}

#[derive(Debug, Deserialize)]
struct ServerVersion {
    #[serde(rename = "gitVersion")]
    git_version: String,
}

fn parse_server_version(json: &str, command: &str) -> Result<String, ClusterError> {
    let info: VersionInfo = serde_json::from_str(json).context(DecodeSnafu { command })?;
    let server = info.server_version.context(MissingFieldSnafu {
        command,
        field: "serverVersion",
    })?;
    Ok(server.git_version)
}

#[derive(Debug, Deserialize)]
struct PodList {
    #[serde(default)]
    items: Vec<Pod>,
}

#[derive(Debug, Deserialize)]
struct Pod {
    metadata: PodMetadata,
    #[serde(default)]
    status: PodStatus,
}

#[derive(Debug, Deserialize)]
struct PodMetadata {
    name: String,
    #[serde(default)]
    namespace: String,
    #[serde(rename = "deletionTimestamp")]
    deletion_timestamp: Option<String>,
}

/// Whole seconds, rounded up and never zero, since `--timeout=0s` waits forever.
fn timeout_arg(timeout: Duration) -> String {
    let mut secs = timeout.as_secs();
    if timeout.subsec_nanos() > 0 {
        secs += 1;
    }
    format!("--timeout={}s", secs.max(1))
}

#[derive(Debug, Default, Deserialize)]
struct PodStatus {
    phase: Option<String>,
}

impl PodList {
    fn running_count(&self) -> usize {
        self.items
            .iter()
            .filter(|pod| pod.status.phase.as_deref() == Some("Running"))
            .count()
    }

    fn terminating(self) -> Vec<PodRef> {
        self.items
            .into_iter()
            .filter(|pod| pod.metadata.deletion_timestamp.is_some())
            .map(|pod| PodRef {
                namespace: pod.metadata.namespace,
                name: pod.metadata.name,
            })
            .collect()
    }
}
