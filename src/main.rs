// ABOUTME: Entry point for the kubeploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use clap::error::ErrorKind;
use cli::{Cli, Commands};
use kubeploy::cleanup::CleanupOptions;
use kubeploy::config;
use kubeploy::error::{Error, Result};
use kubeploy::output::{Output, OutputMode};
use kubeploy::types::DomainName;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    // Dropping the command future on a signal removes the render workspace.
    let result = tokio::select! {
        result = run(cli, mode) => result,
        _ = shutdown_signal() => Err(Error::Interrupted),
    };

    if let Err(e) = result {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { namespace, force } => {
            config::init_config(&cwd, namespace.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Deploy { domain } => {
            let domain = DomainName::new(&domain)?;
            let config = commands::load_config(cli.config.as_ref(), &cwd)?;
            commands::deploy(config, domain, &cwd, output).await
        }
        Commands::Cleanup {
            force,
            cluster,
            dry_run,
            restore,
        } => {
            let config = commands::load_config(cli.config.as_ref(), &cwd)?;
            let options = CleanupOptions {
                force,
                cluster_resources: cluster,
                dry_run,
                restore_only: restore,
            };
            commands::cleanup(config, options, output).await
        }
        Commands::Status => {
            let config = commands::load_config(cli.config.as_ref(), &cwd)?;
            commands::status(config, output).await
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::debug!("cannot listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
