// ABOUTME: Cleanup command implementation.
// ABOUTME: Wires stdin confirmation and the real cluster/cloud clients into the Cleaner.

use kubeploy::cleanup::{Cleaner, CleanupOptions, CleanupOutcome};
use kubeploy::cloud::AwsCli;
use kubeploy::config::Config;
use kubeploy::diagnostics::Diagnostics;
use kubeploy::error::Result;
use kubeploy::kube::Kubectl;
use kubeploy::output::Output;
use kubeploy::status::collect_status;
use tokio::io::BufReader;

pub async fn cleanup(config: Config, options: CleanupOptions, mut output: Output) -> Result<()> {
    output.start_timer();
    let cluster = Kubectl::default();
    let cloud = AwsCli::default();
    let mut diag = Diagnostics::default();

    if !options.restore_only {
        output.progress("Current state:");
        output.block(&collect_status(&cluster, &config).await.render());
    }

    let mut stdin = BufReader::new(tokio::io::stdin());
    let outcome = Cleaner::new(&cluster, &cloud, &config, &output)
        .run(options, &mut stdin, &mut diag)
        .await?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    match outcome {
        CleanupOutcome::Cancelled => {}
        CleanupOutcome::Restored(restored) => {
            output.success(&format!("Restored {} backup file(s)", restored.len()));
        }
        CleanupOutcome::WouldRestore(files) => {
            output.success(&format!(
                "Dry run complete; would restore {} backup file(s)",
                files.len()
            ));
        }
        CleanupOutcome::Completed(summary) if summary.dry_run => {
            output.progress("State after dry run:");
            output.block(&collect_status(&cluster, &config).await.render());
            output.success(&format!(
                "Dry run complete; nothing was changed (would restore {} backup file(s))",
                summary.would_restore.len()
            ));
        }
        CleanupOutcome::Completed(summary) => {
            let namespace = if summary.namespace_gone {
                "removed"
            } else {
                "still terminating"
            };
            output.success(&format!(
                "Cleanup complete: namespace {} {}, {} issuer(s) deleted, {} backup(s) restored",
                config.namespace,
                namespace,
                summary.issuers_deleted.len(),
                summary.restored.len()
            ));
        }
    }

    Ok(())
}
