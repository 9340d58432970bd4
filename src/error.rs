// ABOUTME: Application-wide error types for kubeploy.
// ABOUTME: Uses thiserror; each fatal deploy/cleanup failure has its own variant.

use crate::cloud::CloudError;
use crate::kube::ClusterError;
use crate::types::DomainNameError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid domain name: {0}")]
    Validation(#[from] DomainNameError),

    #[error("required tool not found: {tool} ({hint})")]
    MissingDependency { tool: String, hint: String },

    #[error("wrong cluster: current context is '{actual}', expected '{expected}'")]
    WrongCluster { actual: String, expected: String },

    #[error("cluster is unreachable: {0}")]
    ClusterUnreachable(ClusterError),

    #[error("ingress template not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("cannot write rendered manifest to {path}: {source}")]
    RenderTargetUnwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("rendered manifest missing: {0}")]
    MissingRenderedManifest(PathBuf),

    #[error("failed to apply {manifest}: {source}")]
    ApplyFailed {
        manifest: PathBuf,
        source: ClusterError,
    },

    #[error("cluster error: {0}")]
    Cluster(#[from] ClusterError),

    #[error("cloud error: {0}")]
    Cloud(#[from] CloudError),

    #[error("hook failed: {0}")]
    Hook(String),

    #[error("interrupted")]
    Interrupted,

    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
