// ABOUTME: Cluster control-plane error types with SNAFU pattern.
// ABOUTME: Classifies kubectl failures so callers can treat NotFound as satisfied.

use snafu::Snafu;

/// Errors from talking to the cluster control plane.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ClusterError {
    #[snafu(display("failed to run {program}: {source}"))]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("`{command}` failed: {stderr}"))]
    CommandFailed { command: String, stderr: String },

    #[snafu(display("unexpected output from `{command}`: {source}"))]
    Decode {
        command: String,
        source: serde_json::Error,
    },

    #[snafu(display("`{command}` returned no {field}"))]
    MissingField { command: String, field: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterErrorKind {
    /// The named resource does not exist.
    NotFound,
    /// The control plane refused the request.
    Rejected,
    /// The control plane or the kubectl binary could not be reached.
    Unavailable,
    /// Output could not be interpreted.
    Malformed,
}

impl ClusterError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ClusterErrorKind {
        match self {
            ClusterError::Spawn { .. } => ClusterErrorKind::Unavailable,
            ClusterError::CommandFailed { stderr, .. } => classify_stderr(stderr),
            ClusterError::Decode { .. } | ClusterError::MissingField { .. } => {
                ClusterErrorKind::Malformed
            }
        }
    }

    /// Whether the failure means the target resource is already gone.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ClusterErrorKind::NotFound
    }
}

fn classify_stderr(stderr: &str) -> ClusterErrorKind {
    if stderr.contains("NotFound")
        || stderr.contains("not found")
        || stderr.contains("doesn't have a resource type")
    {
        ClusterErrorKind::NotFound
    } else if stderr.contains("Unable to connect")
        || stderr.contains("connection refused")
        || stderr.contains("no such host")
    {
        ClusterErrorKind::Unavailable
    } else {
        ClusterErrorKind::Rejected
    }
}
