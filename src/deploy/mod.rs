// ABOUTME: Deploy orchestration: prerequisites, render, apply, wait, report.
// ABOUTME: Generic over ClusterOps/CloudOps so the sequence can run against fakes.

mod apply;
mod wait;

pub use apply::{ManifestFile, apply_manifests, manifest_set};
pub use wait::{RolloutObservation, wait_for_rollout};

use crate::cloud::CloudOps;
use crate::config::{Config, DOMAIN_PLACEHOLDER};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::exec;
use crate::kube::ClusterOps;
use crate::output::Output;
use crate::prereq::{self, ClusterIdentity, ToolLookup};
use crate::status::{StatusReport, collect_status};
use crate::template::{self, Workspace};
use crate::types::{DomainName, ManifestKind};
use std::path::PathBuf;

/// What a successful deploy did and saw.
#[derive(Debug, Clone)]
pub struct DeploySummary {
    pub domain: DomainName,
    pub cluster: ClusterIdentity,
    pub applied: Vec<ManifestKind>,
    pub observation: RolloutObservation,
    pub status: StatusReport,
}

/// Runs one deploy against a cluster and cloud provider.
pub struct Deployer<'a, C, P> {
    cluster: &'a C,
    cloud: &'a P,
    config: &'a Config,
    output: &'a Output,
    tool_lookup: ToolLookup,
    workspace_parent: Option<PathBuf>,
}

impl<'a, C: ClusterOps, P: CloudOps> Deployer<'a, C, P> {
    pub fn new(cluster: &'a C, cloud: &'a P, config: &'a Config, output: &'a Output) -> Self {
        Self {
            cluster,
            cloud,
            config,
            output,
            tool_lookup: exec::find_executable,
            workspace_parent: None,
        }
    }

    /// Override how required tools are located.
    pub fn tool_lookup(mut self, lookup: ToolLookup) -> Self {
        self.tool_lookup = lookup;
        self
    }

    /// Create the render workspace under `dir` instead of the system temp dir.
    pub fn workspace_in(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace_parent = Some(dir.into());
        self
    }

    /// Deploy the manifest set for `domain`.
    ///
    /// Structural problems (tools, cluster identity, template, apply) are
    /// returned as errors. Slow convergence is recorded in `diag` and the
    /// run still completes.
    pub async fn run(&self, domain: &DomainName, diag: &mut Diagnostics) -> Result<DeploySummary> {
        let config = self.config;
        let output = self.output;

        output.progress("Checking prerequisites...");
        prereq::check_tools(config.tools.iter(), self.tool_lookup, output)?;
        let cluster = prereq::check_cluster(self.cluster, config, output).await?;
        prereq::probe_namespace(self.cluster, config, output).await;
        if config.certificate_check {
            prereq::check_certificate(self.cloud, config, domain, output, diag).await;
        }

        output.progress("Rendering ingress...");
        let workspace = match self.workspace_parent {
            Some(ref parent) => Workspace::create_in(parent)?,
            None => Workspace::create()?,
        };
        template::render_file(
            &config.ingress_template_path(),
            &[(DOMAIN_PLACEHOLDER, domain.as_str())],
            &workspace.file(ManifestKind::Ingress.filename()),
        )?;

        output.progress(&format!("Applying manifests to {}...", config.namespace));
        let manifests = manifest_set(config, workspace.path());
        let applied = match apply_manifests(self.cluster, &manifests, output, diag).await {
            Ok(applied) => applied,
            Err(e) => {
                output.progress("Current state:");
                let report = collect_status(self.cluster, config).await;
                output.block(&report.render());
                return Err(e);
            }
        };
        drop(workspace);

        output.progress("Waiting for rollout...");
        let observation = wait_for_rollout(self.cluster, config, output, diag).await;

        let status = collect_status(self.cluster, config).await;
        output.block(&status.render());

        Ok(DeploySummary {
            domain: domain.clone(),
            cluster,
            applied,
            observation,
            status,
        })
    }
}
