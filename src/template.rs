// ABOUTME: Placeholder substitution for manifest templates.
// ABOUTME: Renders into a scoped temporary directory removed on drop.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Format a placeholder name as it appears in a template: `${NAME}`.
pub fn token(name: &str) -> String {
    format!("${{{name}}}")
}

/// Replace every `${NAME}` occurrence for each `(NAME, value)` pair.
///
/// All other bytes are left untouched.
pub fn render_str(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&token(name), value)
    })
}

/// Render `template` into `target`, creating the target's directory if needed.
pub fn render_file(template: &Path, vars: &[(&str, &str)], target: &Path) -> Result<()> {
    if !template.is_file() {
        return Err(Error::TemplateNotFound(template.to_path_buf()));
    }
    let content = std::fs::read_to_string(template)?;

    for (name, _) in vars {
        if !content.contains(&token(name)) {
            tracing::warn!(
                "template {} has no {} placeholder",
                template.display(),
                token(name)
            );
        }
    }

    let unwritable = |source: std::io::Error| Error::RenderTargetUnwritable {
        path: target.to_path_buf(),
        source,
    };
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(unwritable)?;
    }
    std::fs::write(target, render_str(&content, vars)).map_err(unwritable)?;

    tracing::debug!("rendered {} -> {}", template.display(), target.display());
    Ok(())
}

/// Scratch directory for rendered manifests.
///
/// The directory and everything in it is deleted when this value is
/// dropped, which covers normal return, error return, and cancellation of
/// the owning future.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a workspace under the system temporary directory.
    pub fn create() -> Result<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    /// Create a workspace under `parent`.
    pub fn create_in(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("kubeploy-")
            .tempdir_in(parent)
            .map_err(|source| Error::RenderTargetUnwritable {
                path: parent.to_path_buf(),
                source,
            })?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
