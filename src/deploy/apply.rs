// ABOUTME: Ordered declarative apply of the deployment's manifests.
// ABOUTME: Missing static files are skipped; a missing rendered file is fatal.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning, WarningKind};
use crate::error::{Error, Result};
use crate::kube::ClusterOps;
use crate::output::Output;
use crate::types::ManifestKind;

/// A manifest file paired with the role it plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    pub kind: ManifestKind,
    pub path: PathBuf,
}

/// Build the manifest list in apply order. Static manifests come from the
/// configured directory; the ingress comes from `rendered_dir`.
pub fn manifest_set(config: &Config, rendered_dir: &Path) -> Vec<ManifestFile> {
    ManifestKind::APPLY_ORDER
        .iter()
        .map(|&kind| {
            let path = if kind.is_rendered() {
                rendered_dir.join(kind.filename())
            } else {
                config.manifest_path(kind.filename())
            };
            ManifestFile { kind, path }
        })
        .collect()
}

/// Apply each manifest in order, returning the kinds that were applied.
///
/// Stops at the first failed apply. Nothing already applied is rolled back;
/// re-running converges the cluster.
pub async fn apply_manifests<C: ClusterOps>(
    cluster: &C,
    manifests: &[ManifestFile],
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<Vec<ManifestKind>> {
    let mut applied = Vec::with_capacity(manifests.len());

    for manifest in manifests {
        if !manifest.path.is_file() {
            if manifest.kind.is_rendered() {
                return Err(Error::MissingRenderedManifest(manifest.path.clone()));
            }
            diag.warn(Warning::new(
                WarningKind::ManifestSkipped,
                format!("{} not found, skipping", manifest.path.display()),
            ));
            continue;
        }

        output.progress(&format!("  → Applying {}...", manifest.kind));
        cluster
            .apply(&manifest.path)
            .await
            .map_err(|source| Error::ApplyFailed {
                manifest: manifest.path.clone(),
                source,
            })?;
        applied.push(manifest.kind);
    }

    Ok(applied)
}
