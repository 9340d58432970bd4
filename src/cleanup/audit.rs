// ABOUTME: Post-cleanup audits for resources the namespace delete does not cover.
// ABOUTME: Reports cloud leftovers and stuck cluster objects; never deletes them.

use crate::cloud::CloudOps;
use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning, WarningKind};
use crate::kube::{ClusterOps, ResourceQuery};
use crate::output::Output;
use crate::types::ResourceKind;

/// Look for load balancers and security groups named after this app that
/// live outside the namespace's lifecycle.
pub async fn audit_cloud<P: CloudOps>(
    cloud: &P,
    config: &Config,
    output: &Output,
    diag: &mut Diagnostics,
) {
    let region = config.cluster.region.as_str();
    let pattern = config.load_balancer_pattern();
    output.progress(&format!(
        "Checking {} for leftover cloud resources matching {}...",
        region, pattern
    ));

    match cloud.find_load_balancers(region, &pattern).await {
        Ok(found) if found.is_empty() => output.progress("  ✓ No load balancers left"),
        Ok(found) => {
            for lb in found {
                diag.warn(Warning::new(
                    WarningKind::OrphanedLoadBalancer,
                    format!(
                        "load balancer {} ({}) still exists; remove it with: {}",
                        lb.name,
                        lb.dns_name,
                        lb.remediation(region)
                    ),
                ));
            }
        }
        Err(e) => diag.warn(Warning::new(
            WarningKind::CloudAuditUnavailable,
            format!("could not list load balancers: {e}"),
        )),
    }

    match cloud
        .find_security_groups(region, config.cluster.name.as_deref(), &pattern)
        .await
    {
        Ok(found) if found.is_empty() => output.progress("  ✓ No security groups left"),
        Ok(found) => {
            for sg in found {
                diag.warn(Warning::new(
                    WarningKind::OrphanedSecurityGroup,
                    format!(
                        "security group {} ({}) still exists; remove it with: {}",
                        sg.name,
                        sg.id,
                        sg.remediation(region)
                    ),
                ));
            }
        }
        Err(e) => diag.warn(Warning::new(
            WarningKind::CloudAuditUnavailable,
            format!("could not list security groups: {e}"),
        )),
    }
}

/// Re-query what cleanup should have removed and flag anything still there.
pub async fn report_remaining<C: ClusterOps>(
    cluster: &C,
    config: &Config,
    remove_issuers: bool,
    dry_run: bool,
    output: &Output,
    diag: &mut Diagnostics,
) {
    output.progress("Checking for remaining resources...");

    let namespace = ResourceQuery::new(ResourceKind::Namespace).named(&config.namespace);
    match cluster.exists(&namespace).await {
        Ok(true) if dry_run => output.progress(&format!(
            "  → Namespace {} still present (dry run)",
            config.namespace
        )),
        Ok(true) => diag.warn(Warning::new(
            WarningKind::RemainingResource,
            format!(
                "namespace {} still exists; force it with: kubectl delete namespace {} --force --grace-period=0",
                config.namespace, config.namespace
            ),
        )),
        Ok(false) => output.progress(&format!("  ✓ Namespace {} is gone", config.namespace)),
        Err(e) => tracing::warn!("could not check namespace {}: {}", config.namespace, e),
    }

    for issuer in &config.issuers {
        let query = ResourceQuery::new(ResourceKind::ClusterIssuer).named(issuer);
        match cluster.exists(&query).await {
            Ok(true) if remove_issuers && !dry_run => diag.warn(Warning::new(
                WarningKind::RemainingResource,
                format!(
                    "cluster issuer {issuer} still exists; remove it with: kubectl delete clusterissuer {issuer}"
                ),
            )),
            Ok(true) => output.progress(&format!("  → Cluster issuer {issuer} kept")),
            Ok(false) => {}
            Err(e) => tracing::debug!("could not check cluster issuer {}: {}", issuer, e),
        }
    }

    match cluster.terminating_pods().await {
        Ok(pods) => {
            for pod in pods {
                diag.warn(Warning::new(
                    WarningKind::RemainingResource,
                    format!(
                        "pod {pod} is stuck terminating; force it with: kubectl delete pod {} -n {} --force --grace-period=0",
                        pod.name, pod.namespace
                    ),
                ));
            }
        }
        Err(e) => tracing::warn!("could not list terminating pods: {}", e),
    }
}
