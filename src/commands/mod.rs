// ABOUTME: Command module aggregator for the kubeploy CLI.
// ABOUTME: Re-exports the deploy, cleanup, status, and init command handlers.

mod cleanup;
mod deploy;
mod status;

pub use cleanup::cleanup;
pub use deploy::deploy;
pub use status::status;

use kubeploy::config::Config;
use kubeploy::error::Result;
use std::path::{Path, PathBuf};

/// Load the config named on the command line, or discover one in `cwd`.
///
/// Relative paths in an explicit config resolve against the file's directory.
pub fn load_config(explicit: Option<&PathBuf>, cwd: &Path) -> Result<Config> {
    match explicit {
        Some(path) => {
            let base = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| cwd.join(p))
                .unwrap_or_else(|| cwd.to_path_buf());
            Ok(Config::load(path)?.anchored(&base))
        }
        None => Config::discover(cwd),
    }
}
