// ABOUTME: Post-apply waits for the deployment, its pods, and the ingress address.
// ABOUTME: Every timeout here is a warning; the run continues to the final report.

use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning, WarningKind};
use crate::kube::{ClusterOps, ResourceQuery};
use crate::output::Output;
use crate::poll::{PollOutcome, poll_until};
use crate::types::ResourceKind;

/// What the waits observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolloutObservation {
    pub deployment_observed: bool,
    pub rollout_complete: bool,
    pub running_pods: Option<usize>,
    pub ingress_hostname: Option<String>,
}

/// Run all four waits in sequence.
pub async fn wait_for_rollout<C: ClusterOps>(
    cluster: &C,
    config: &Config,
    output: &Output,
    diag: &mut Diagnostics,
) -> RolloutObservation {
    let deployment_observed = wait_for_deployment(cluster, config, output, diag).await;
    let rollout_complete = wait_for_rollout_status(cluster, config, output, diag).await;
    let running_pods = wait_for_pods(cluster, config, output, diag).await;
    let ingress_hostname = wait_for_ingress(cluster, config, output, diag).await;

    RolloutObservation {
        deployment_observed,
        rollout_complete,
        running_pods,
        ingress_hostname,
    }
}

async fn wait_for_deployment<C: ClusterOps>(
    cluster: &C,
    config: &Config,
    output: &Output,
    diag: &mut Diagnostics,
) -> bool {
    output.progress(&format!("  → Waiting for deployment {}...", config.app));
    let query = ResourceQuery::new(ResourceKind::Deployment)
        .named(&config.app)
        .in_namespace(&config.namespace);
    let query = &query;

    let outcome = poll_until(&config.polling.deployment, "deployment", |_| async move {
        matches!(cluster.exists(query).await, Ok(true)).then_some(())
    })
    .await;

    if outcome.is_ready() {
        return true;
    }

    diag.warn(Warning::new(
        WarningKind::DeploymentNotObserved,
        format!(
            "deployment {} not observed after {} attempts",
            config.app,
            outcome.attempts()
        ),
    ));
    false
}

async fn wait_for_rollout_status<C: ClusterOps>(
    cluster: &C,
    config: &Config,
    output: &Output,
    diag: &mut Diagnostics,
) -> bool {
    let timeout = config.polling.rollout_timeout;
    output.progress(&format!(
        "  → Waiting up to {}s for rollout to complete...",
        timeout.as_secs()
    ));

    let message = match cluster
        .rollout_status(&config.app, &config.namespace, timeout)
        .await
    {
        Ok(true) => {
            output.progress("  ✓ Rollout complete");
            return true;
        }
        Ok(false) => format!(
            "rollout of {} did not finish within {}s",
            config.app,
            timeout.as_secs()
        ),
        Err(e) => format!("could not check rollout of {}: {}", config.app, e),
    };

    diag.warn(Warning::new(WarningKind::RolloutTimeout, message));
    dump_rollout_state(cluster, config, output).await;
    false
}

/// Print the deployment and pod listings to help diagnose a stuck rollout.
async fn dump_rollout_state<C: ClusterOps>(cluster: &C, config: &Config, output: &Output) {
    let queries = [
        ResourceQuery::new(ResourceKind::Deployment)
            .named(&config.app)
            .in_namespace(&config.namespace),
        ResourceQuery::new(ResourceKind::Pod)
            .in_namespace(&config.namespace)
            .selector(config.selector()),
    ];
    for query in &queries {
        match cluster.get(query).await {
            Ok(text) => output.block(&text),
            Err(e) => tracing::debug!("could not fetch {}: {}", query.kind, e),
        }
    }
}

async fn wait_for_pods<C: ClusterOps>(
    cluster: &C,
    config: &Config,
    output: &Output,
    diag: &mut Diagnostics,
) -> Option<usize> {
    output.progress("  → Waiting for pods to be running...");
    let selector = config.selector();
    let (namespace, selector) = (config.namespace.as_str(), selector.as_str());

    let outcome = poll_until(&config.polling.pods, "pods", |_| async move {
        match cluster.running_pods(namespace, selector).await {
            Ok(count) if count > 0 => Some(count),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("pod query failed: {}", e);
                None
            }
        }
    })
    .await;

    match outcome {
        PollOutcome::Ready { value, .. } => {
            output.progress(&format!("  ✓ {} pod(s) running", value));
            Some(value)
        }
        PollOutcome::Exhausted { attempts } => {
            diag.warn(Warning::new(
                WarningKind::PodsNotReady,
                format!("no running pods matching {selector} after {attempts} attempts"),
            ));
            None
        }
    }
}

async fn wait_for_ingress<C: ClusterOps>(
    cluster: &C,
    config: &Config,
    output: &Output,
    diag: &mut Diagnostics,
) -> Option<String> {
    output.progress("  → Waiting for ingress address...");
    let (name, namespace) = (config.app.as_str(), config.namespace.as_str());

    let outcome = poll_until(&config.polling.ingress, "ingress", |_| async move {
        cluster.ingress_hostname(name, namespace).await.ok().flatten()
    })
    .await;

    match outcome {
        PollOutcome::Ready { value, .. } => {
            output.progress(&format!("  ✓ Ingress address: {}", value));
            Some(value)
        }
        PollOutcome::Exhausted { attempts } => {
            diag.warn(Warning::new(
                WarningKind::IngressAddressPending,
                format!(
                    "ingress {name} has no address after {attempts} attempts; \
                     the load balancer may still be provisioning"
                ),
            ));
            None
        }
    }
}
