// ABOUTME: Prerequisite checks run before anything is applied.
// ABOUTME: Required tools, cluster identity, namespace probe, and certificate lookup.

use crate::cloud::CloudOps;
use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning, WarningKind};
use crate::error::{Error, Result};
use crate::kube::{ClusterOps, ResourceQuery};
use crate::output::Output;
use crate::types::{DomainName, ResourceKind};
use std::path::PathBuf;

/// Resolves a tool name to an executable path.
pub type ToolLookup = fn(&str) -> Option<PathBuf>;

/// Install hint shown when a required tool is missing.
pub fn install_hint(tool: &str) -> String {
    match tool {
        "kubectl" => "install kubectl: https://kubernetes.io/docs/tasks/tools/".to_string(),
        "aws" => "install the AWS CLI: https://aws.amazon.com/cli/".to_string(),
        other => format!("install {other} and make sure it is on PATH"),
    }
}

/// Fail with `MissingDependency` on the first tool that cannot be resolved.
pub fn check_tools<'a>(
    tools: impl IntoIterator<Item = &'a String>,
    lookup: ToolLookup,
    output: &Output,
) -> Result<()> {
    for tool in tools {
        match lookup(tool) {
            Some(path) => output.progress(&format!("  ✓ {} ({})", tool, path.display())),
            None => {
                return Err(Error::MissingDependency {
                    tool: tool.clone(),
                    hint: install_hint(tool),
                });
            }
        }
    }
    Ok(())
}

/// Identity of the cluster we are about to touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterIdentity {
    pub context: String,
    pub server_version: String,
    /// Whether `context` was checked against a configured `cluster.context`.
    pub pinned: bool,
}

/// Verify the bound context matches the configured one and that the
/// control plane answers a read call.
pub async fn check_cluster<C: ClusterOps>(
    cluster: &C,
    config: &Config,
    output: &Output,
) -> Result<ClusterIdentity> {
    let context = cluster.current_context().await?;

    if let Some(ref expected) = config.cluster.context
        && *expected != context
    {
        return Err(Error::WrongCluster {
            actual: context,
            expected: expected.clone(),
        });
    }

    let server_version = cluster
        .server_version()
        .await
        .map_err(Error::ClusterUnreachable)?;

    let pinned = config.cluster.context.is_some();
    if pinned {
        output.progress(&format!(
            "  ✓ Cluster context {} (server {})",
            context, server_version
        ));
    } else {
        tracing::info!("no cluster.context configured; accepting {}", context);
        output.progress(&format!(
            "  → Cluster context {} accepted without a pin (server {}); set cluster.context to enforce it",
            context, server_version
        ));
    }

    Ok(ClusterIdentity {
        context,
        server_version,
        pinned,
    })
}

/// Report whether the target namespace already exists. Never fails the run.
pub async fn probe_namespace<C: ClusterOps>(cluster: &C, config: &Config, output: &Output) -> bool {
    let query = ResourceQuery::new(ResourceKind::Namespace).named(&config.namespace);
    match cluster.exists(&query).await {
        Ok(true) => {
            output.progress(&format!("  ✓ Namespace {} exists", config.namespace));
            true
        }
        Ok(false) => {
            output.progress(&format!(
                "  → Namespace {} not found; it will be created",
                config.namespace
            ));
            false
        }
        Err(e) => {
            tracing::info!("could not probe namespace {}: {}", config.namespace, e);
            false
        }
    }
}

/// Look for a certificate covering `domain`. Advisory only.
pub async fn check_certificate<P: CloudOps>(
    cloud: &P,
    config: &Config,
    domain: &DomainName,
    output: &Output,
    diag: &mut Diagnostics,
) {
    let mut patterns = vec![domain.to_string()];
    if let Some(wildcard) = domain.wildcard() {
        patterns.push(wildcard);
    }

    for pattern in &patterns {
        match cloud
            .find_certificates(&config.cluster.region, pattern)
            .await
        {
            Ok(certs) if !certs.is_empty() => {
                output.progress(&format!("  ✓ Certificate for {}: {}", pattern, certs[0].arn));
                return;
            }
            Ok(_) => {}
            Err(e) => {
                diag.warn(Warning::new(
                    WarningKind::CloudAuditUnavailable,
                    format!("certificate lookup failed: {e}"),
                ));
                return;
            }
        }
    }

    diag.warn(Warning::new(
        WarningKind::CertificateMissing,
        format!(
            "no certificate found for {} in {}; the ingress controller must provide one",
            patterns.join(" or "),
            config.cluster.region
        ),
    ));
}
