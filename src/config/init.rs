// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a commented kubeploy.yml holding the built-in defaults.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config};

pub fn init_config(dir: &Path, namespace: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::default();
    if let Some(ns) = namespace {
        if ns.trim().is_empty() {
            return Err(Error::InvalidConfig("namespace cannot be empty".to_string()));
        }
        config.namespace = ns.to_string();
    }

    std::fs::write(&config_path, generate_template_yaml(&config))?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let polling = &config.polling;
    let issuers: String = config
        .issuers
        .iter()
        .map(|i| format!("  - {i}\n"))
        .collect();
    let tools: String = config.tools.iter().map(|t| format!("  - {t}\n")).collect();

    format!(
        r#"app: {app}
namespace: {namespace}
manifests_dir: {manifests}
ingress_template: {template}

cluster:
  # Exact kube context name required before deploying.
  # context: arn:aws:eks:us-east-1:123456789012:cluster/demo
  # Cluster name used for load balancer controller tags.
  # name: demo
  region: {region}

tools:
{tools}
certificate_check: {certificate_check}

issuers:
{issuers}
polling:
  deployment: {{ attempts: {dep_n}, interval: {dep_i} }}
  rollout_timeout: {rollout}
  pods: {{ attempts: {pods_n}, interval: {pods_i} }}
  ingress: {{ attempts: {ing_n}, interval: {ing_i} }}
  namespace_deletion: {{ attempts: {ns_n}, interval: {ns_i} }}
  progress_every: {progress}
"#,
        app = config.app,
        namespace = config.namespace,
        manifests = "k8s",
        template = config.ingress_template,
        region = config.cluster.region,
        certificate_check = config.certificate_check,
        dep_n = polling.deployment.attempts,
        dep_i = secs(polling.deployment.interval),
        rollout = secs(polling.rollout_timeout),
        pods_n = polling.pods.attempts,
        pods_i = secs(polling.pods.interval),
        ing_n = polling.ingress.attempts,
        ing_i = secs(polling.ingress.interval),
        ns_n = polling.namespace_deletion.attempts,
        ns_i = secs(polling.namespace_deletion.interval),
        progress = secs(polling.progress_every),
    )
}

fn secs(duration: std::time::Duration) -> String {
    format!("{}s", duration.as_secs())
}
