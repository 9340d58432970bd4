// ABOUTME: Restores manifest backups left next to the originals.
// ABOUTME: `ingress.yaml.bak` is renamed back over `ingress.yaml`.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Suffix marking a pre-modification snapshot of a manifest.
pub const BACKUP_SUFFIX: &str = ".bak";

/// A backup file and the file it restores to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub backup: PathBuf,
    pub original: PathBuf,
}

/// List backups directly inside `dir`, sorted by path. A missing directory has none.
pub fn find_backups(dir: &Path) -> Result<Vec<Backup>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(original) = name.strip_suffix(BACKUP_SUFFIX)
            && !original.is_empty()
        {
            backups.push(Backup {
                original: dir.join(original),
                backup: path.clone(),
            });
        }
    }

    backups.sort_by(|a, b| a.backup.cmp(&b.backup));
    Ok(backups)
}

/// Rename each backup over its original. Returns the restored originals.
pub fn restore_backups(backups: &[Backup]) -> Result<Vec<PathBuf>> {
    let mut restored = Vec::with_capacity(backups.len());
    for backup in backups {
        std::fs::rename(&backup.backup, &backup.original)?;
        tracing::info!(
            "restored {} from {}",
            backup.original.display(),
            backup.backup.display()
        );
        restored.push(backup.original.clone());
    }
    Ok(restored)
}
