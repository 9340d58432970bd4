// ABOUTME: Library root for kubeploy - exposes the deploy and cleanup engines for testing.
// ABOUTME: The main binary is in main.rs.

pub mod cleanup;
pub mod cloud;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod exec;
pub mod hooks;
pub mod kube;
pub mod output;
pub mod poll;
pub mod prereq;
pub mod status;
pub mod template;
pub mod types;
