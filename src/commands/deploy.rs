// ABOUTME: Deploy command implementation.
// ABOUTME: Validates the domain, runs lifecycle hooks, and drives the Deployer.

use kubeploy::cloud::AwsCli;
use kubeploy::config::Config;
use kubeploy::deploy::Deployer;
use kubeploy::diagnostics::{Diagnostics, Warning, WarningKind};
use kubeploy::error::{Error, Result};
use kubeploy::hooks::{HookContext, HookPoint, HookRunner};
use kubeploy::kube::Kubectl;
use kubeploy::output::Output;
use kubeploy::types::DomainName;
use std::path::Path;

/// Deploy the manifest set for `domain`.
pub async fn deploy(
    config: Config,
    domain: DomainName,
    project_dir: &Path,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let hook_runner = HookRunner::new(project_dir);
    let hook_context = HookContext::new(&config, &domain);
    let mut diag = Diagnostics::default();

    output.progress(&format!(
        "Deploying {} to namespace {} for {}",
        config.app, config.namespace, domain
    ));

    if let Some(result) = hook_runner.run(HookPoint::PreDeploy, &hook_context).await
        && !result.success
    {
        if !result.stderr.is_empty() {
            eprintln!("{}", result.stderr.trim_end());
        }
        return Err(Error::Hook("pre-deploy hook failed".to_string()));
    }

    let cluster = Kubectl::default();
    let cloud = AwsCli::default();
    let result = Deployer::new(&cluster, &cloud, &config, &output)
        .run(&domain, &mut diag)
        .await;

    let point = if result.is_ok() {
        HookPoint::PostDeploy
    } else {
        HookPoint::OnError
    };
    if let Some(hook) = hook_runner.run(point, &hook_context).await
        && !hook.success
    {
        diag.warn(Warning::new(
            WarningKind::HookFailed,
            format!("{} hook failed", point.filename()),
        ));
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    let summary = result?;
    let address = summary
        .observation
        .ingress_hostname
        .as_deref()
        .unwrap_or("pending");
    output.success(&format!(
        "Deployed {} at https://{} (load balancer: {})",
        config.app, summary.domain, address
    ));
    Ok(())
}
