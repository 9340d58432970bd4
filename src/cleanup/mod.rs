// ABOUTME: Cleanup orchestration: confirm, delete namespace and issuers, audit, restore.
// ABOUTME: Dry run limits the run to read-only cluster and cloud calls.

mod audit;
mod backup;

pub use audit::{audit_cloud, report_remaining};
pub use backup::{BACKUP_SUFFIX, Backup, find_backups, restore_backups};

use crate::cloud::CloudOps;
use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning, WarningKind};
use crate::error::Result;
use crate::kube::{ClusterOps, ResourceQuery};
use crate::output::Output;
use crate::poll::poll_until;
use crate::types::ResourceKind;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Flags controlling a cleanup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Skip the confirmation prompt.
    pub force: bool,
    /// Also delete the cluster-scoped issuers.
    pub cluster_resources: bool,
    /// Issue read-only calls only.
    pub dry_run: bool,
    /// Only restore backups, then stop.
    pub restore_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The operator declined at the prompt. Nothing was touched.
    Cancelled,
    /// `restore_only` run.
    Restored(Vec<PathBuf>),
    /// `restore_only` dry run: the files a real run would overwrite.
    WouldRestore(Vec<PathBuf>),
    Completed(CleanupSummary),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub namespace_deleted: bool,
    pub namespace_gone: bool,
    pub issuers_deleted: Vec<String>,
    pub restored: Vec<PathBuf>,
    /// Dry run only: files that would have been restored.
    pub would_restore: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Runs one cleanup against a cluster and cloud provider.
pub struct Cleaner<'a, C, P> {
    cluster: &'a C,
    cloud: &'a P,
    config: &'a Config,
    output: &'a Output,
}

impl<'a, C: ClusterOps, P: CloudOps> Cleaner<'a, C, P> {
    pub fn new(cluster: &'a C, cloud: &'a P, config: &'a Config, output: &'a Output) -> Self {
        Self {
            cluster,
            cloud,
            config,
            output,
        }
    }

    /// Run cleanup. `input` supplies the answer to the confirmation prompt.
    pub async fn run<R: AsyncBufRead + Unpin>(
        &self,
        options: CleanupOptions,
        input: &mut R,
        diag: &mut Diagnostics,
    ) -> Result<CleanupOutcome> {
        if options.restore_only {
            let files = self.restore(options.dry_run)?;
            return Ok(if options.dry_run {
                CleanupOutcome::WouldRestore(files)
            } else {
                CleanupOutcome::Restored(files)
            });
        }

        if !options.force && !self.confirm(options, input).await? {
            self.output.progress("Cleanup cancelled");
            return Ok(CleanupOutcome::Cancelled);
        }

        let mut summary = CleanupSummary {
            dry_run: options.dry_run,
            ..CleanupSummary::default()
        };

        (summary.namespace_deleted, summary.namespace_gone) =
            self.delete_namespace(options.dry_run, diag).await;

        if options.cluster_resources {
            summary.issuers_deleted = self.delete_issuers(options.dry_run).await;
        }

        audit_cloud(self.cloud, self.config, self.output, diag).await;
        report_remaining(
            self.cluster,
            self.config,
            options.cluster_resources,
            options.dry_run,
            self.output,
            diag,
        )
        .await;

        let files = self.restore(options.dry_run)?;
        if options.dry_run {
            summary.would_restore = files;
        } else {
            summary.restored = files;
        }
        Ok(CleanupOutcome::Completed(summary))
    }

    async fn confirm<R: AsyncBufRead + Unpin>(
        &self,
        options: CleanupOptions,
        input: &mut R,
    ) -> Result<bool> {
        let mut prompt = format!(
            "This will delete namespace {} and everything in it",
            self.config.namespace
        );
        if options.cluster_resources {
            prompt.push_str(&format!(
                ", plus cluster issuers {}",
                self.config.issuers.join(", ")
            ));
        }
        prompt.push_str(". Type 'yes' to continue: ");
        self.output.prompt(&prompt);

        let mut answer = String::new();
        input.read_line(&mut answer).await?;
        Ok(answer.trim().eq_ignore_ascii_case("yes"))
    }

    /// Returns (delete issued, namespace confirmed gone).
    async fn delete_namespace(&self, dry_run: bool, diag: &mut Diagnostics) -> (bool, bool) {
        let namespace = self.config.namespace.as_str();
        let query = ResourceQuery::new(ResourceKind::Namespace).named(namespace);

        let exists = match self.cluster.exists(&query).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!("could not check namespace {}: {}", namespace, e);
                true
            }
        };

        if !exists {
            self.output
                .progress(&format!("  ✓ Namespace {namespace} not found; nothing to delete"));
            return (false, true);
        }

        if dry_run {
            self.output
                .progress(&format!("  → [dry run] would delete namespace {namespace}"));
            return (false, false);
        }

        self.output
            .progress(&format!("  → Deleting namespace {namespace}..."));
        match self.cluster.delete_namespace(namespace).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                self.output
                    .progress(&format!("  ✓ Namespace {namespace} already gone"));
                return (false, true);
            }
            Err(e) => {
                diag.warn(Warning::new(
                    WarningKind::RemainingResource,
                    format!("delete of namespace {namespace} failed: {e}"),
                ));
                return (false, false);
            }
        }

        let gone = self.wait_for_namespace_gone(&query).await;
        if gone {
            self.output
                .progress(&format!("  ✓ Namespace {namespace} deleted"));
        } else {
            let budget = self.config.polling.namespace_deletion;
            diag.warn(Warning::new(
                WarningKind::NamespaceDeletionSlow,
                format!(
                    "namespace {namespace} still terminating after {}s; deletion continues in the background",
                    budget.total().as_secs()
                ),
            ));
        }
        (true, gone)
    }

    async fn wait_for_namespace_gone(&self, query: &ResourceQuery) -> bool {
        let cluster = self.cluster;
        let output = self.output;
        let progress_every = self.config.polling.progress_every;
        let started = Instant::now();
        let mut last_report = Duration::ZERO;

        let outcome = poll_until(
            &self.config.polling.namespace_deletion,
            "namespace deletion",
            |_| {
                let elapsed = started.elapsed();
                if !progress_every.is_zero() && elapsed >= last_report + progress_every {
                    last_report = elapsed;
                    output.progress(&format!(
                        "  → Still waiting for namespace deletion ({}s)",
                        elapsed.as_secs()
                    ));
                }
                async move { matches!(cluster.exists(query).await, Ok(false)).then_some(()) }
            },
        )
        .await;

        outcome.is_ready()
    }

    async fn delete_issuers(&self, dry_run: bool) -> Vec<String> {
        let mut deleted = Vec::new();

        for issuer in &self.config.issuers {
            let query = ResourceQuery::new(ResourceKind::ClusterIssuer).named(issuer);
            match self.cluster.exists(&query).await {
                Ok(true) => {}
                Ok(false) => {
                    self.output
                        .progress(&format!("  ✓ Cluster issuer {issuer} not found"));
                    continue;
                }
                Err(e) => {
                    tracing::warn!("could not check cluster issuer {}: {}", issuer, e);
                    continue;
                }
            }

            if dry_run {
                self.output
                    .progress(&format!("  → [dry run] would delete cluster issuer {issuer}"));
                continue;
            }

            match self
                .cluster
                .delete_cluster_resource(ResourceKind::ClusterIssuer, issuer)
                .await
            {
                Ok(()) => {
                    self.output
                        .progress(&format!("  ✓ Deleted cluster issuer {issuer}"));
                    deleted.push(issuer.clone());
                }
                Err(e) if e.is_not_found() => {
                    self.output
                        .progress(&format!("  ✓ Cluster issuer {issuer} already gone"));
                }
                Err(e) => tracing::warn!("failed to delete cluster issuer {}: {}", issuer, e),
            }
        }

        deleted
    }

    /// Returns the files restored, or in a dry run the files that would be.
    fn restore(&self, dry_run: bool) -> Result<Vec<PathBuf>> {
        let backups = find_backups(&self.config.manifests_dir)?;
        if backups.is_empty() {
            self.output.progress("  ✓ No backup files to restore");
            return Ok(Vec::new());
        }

        if dry_run {
            for backup in &backups {
                self.output.progress(&format!(
                    "  → [dry run] would restore {}",
                    backup.original.display()
                ));
            }
            return Ok(backups.into_iter().map(|b| b.original).collect());
        }

        let restored = restore_backups(&backups)?;
        for path in &restored {
            self.output
                .progress(&format!("  ✓ Restored {}", path.display()));
        }
        Ok(restored)
    }
}
