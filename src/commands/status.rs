// ABOUTME: Status command implementation.
// ABOUTME: Prints a read-only snapshot of the deployed resources.

use kubeploy::config::Config;
use kubeploy::error::Result;
use kubeploy::kube::Kubectl;
use kubeploy::output::{Output, OutputMode};
use kubeploy::status::collect_status;

pub async fn status(config: Config, output: Output) -> Result<()> {
    let report = collect_status(&Kubectl::default(), &config).await;

    match output.mode() {
        OutputMode::Normal => print!("{}", report.render()),
        _ => {
            for section in &report.sections {
                if let Err(message) = &section.body {
                    output.warning(&format!("{}: {}", section.kind, message));
                }
            }
            let present = report.sections.iter().filter(|s| s.body.is_ok()).count();
            output.success(&format!(
                "{present}/{} resource kinds present in {}",
                report.sections.len(),
                report.namespace
            ));
        }
    }

    Ok(())
}
