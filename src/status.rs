// ABOUTME: Read-only snapshot of the deployed resources.
// ABOUTME: Used after deploy, on deploy failure, by the status command, and around cleanup.

use crate::config::Config;
use crate::kube::{ClusterOps, ResourceQuery};
use crate::types::ResourceKind;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

/// One resource kind's slice of the snapshot.
#[derive(Debug, Clone)]
pub struct StatusSection {
    pub kind: ResourceKind,
    /// kubectl listing, or the error message if the fetch failed.
    pub body: Result<String, String>,
}

#[derive(Debug, Clone)]
pub struct StatusReport {
    pub taken_at: DateTime<Utc>,
    pub namespace: String,
    pub sections: Vec<StatusSection>,
}

/// Kinds included in every snapshot, in display order.
pub const REPORTED_KINDS: [ResourceKind; 6] = [
    ResourceKind::Namespace,
    ResourceKind::Deployment,
    ResourceKind::Pod,
    ResourceKind::Service,
    ResourceKind::Ingress,
    ResourceKind::HorizontalPodAutoscaler,
];

fn query_for(kind: ResourceKind, config: &Config) -> ResourceQuery {
    match kind {
        ResourceKind::Namespace => ResourceQuery::new(kind).named(&config.namespace),
        ResourceKind::Pod => ResourceQuery::new(kind)
            .in_namespace(&config.namespace)
            .selector(config.selector()),
        _ => ResourceQuery::new(kind)
            .named(&config.app)
            .in_namespace(&config.namespace),
    }
}

/// Fetch the current state of every reported kind. Never mutates the cluster.
pub async fn collect_status<C: ClusterOps>(cluster: &C, config: &Config) -> StatusReport {
    let mut sections = Vec::with_capacity(REPORTED_KINDS.len());
    for kind in REPORTED_KINDS {
        let body = cluster
            .get(&query_for(kind, config))
            .await
            .map_err(|e| e.to_string());
        sections.push(StatusSection { kind, body });
    }

    StatusReport {
        taken_at: Utc::now(),
        namespace: config.namespace.clone(),
        sections,
    }
}

impl StatusReport {
    pub fn kinds(&self) -> Vec<ResourceKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    pub fn section(&self, kind: ResourceKind) -> Option<&StatusSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Whether the namespace was found when the snapshot was taken.
    pub fn namespace_present(&self) -> bool {
        self.section(ResourceKind::Namespace)
            .is_some_and(|s| s.body.is_ok())
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "Status of namespace {} at {}\n",
            self.namespace,
            self.taken_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        for section in &self.sections {
            let _ = writeln!(out, "\n{}:", section.kind);
            match &section.body {
                Ok(text) if text.trim().is_empty() => out.push_str("  (none)\n"),
                Ok(text) => {
                    for line in text.lines() {
                        let _ = writeln!(out, "  {line}");
                    }
                }
                Err(message) => {
                    let _ = writeln!(out, "  unavailable: {message}");
                }
            }
        }
        out
    }
}
