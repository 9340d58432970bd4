// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kubeploy")]
#[command(about = "Deploy and tear down a domain-routed web app on Kubernetes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI (only final result)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// JSON lines output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the configuration file (default: discover in current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new kubeploy.yml configuration file
    Init {
        /// Namespace to write into the config
        #[arg(short, long)]
        namespace: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Render and apply the manifests for a domain, then wait for rollout
    Deploy {
        /// Public hostname served by the ingress (e.g. demo.example.com)
        domain: String,
    },

    /// Delete the deployed namespace and report leftovers
    Cleanup {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,

        /// Also delete cluster-scoped issuers
        #[arg(short, long)]
        cluster: bool,

        /// Show what would be removed without changing anything
        #[arg(short, long)]
        dry_run: bool,

        /// Only restore manifest backups
        #[arg(short, long)]
        restore: bool,
    },

    /// Show the current state of the deployed resources
    Status,
}
