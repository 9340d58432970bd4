// ABOUTME: Cloud provider error types with SNAFU pattern.
// ABOUTME: Covers aws CLI spawn failures, rejected calls, and undecodable output.

use snafu::Snafu;

/// Errors from querying the cloud provider inventory.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CloudError {
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
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudErrorKind {
    /// The CLI is missing or credentials/network are unavailable.
    Unavailable,
    /// The provider refused the request.
    Rejected,
    /// Output could not be interpreted.
    Malformed,
}

impl CloudError {
    pub fn kind(&self) -> CloudErrorKind {
        match self {
            CloudError::Spawn { .. } => CloudErrorKind::Unavailable,
            CloudError::CommandFailed { stderr, .. } => {
                if stderr.contains("Unable to locate credentials")
                    || stderr.contains("Could not connect")
                    || stderr.contains("ExpiredToken")
                {
                    CloudErrorKind::Unavailable
                } else {
                    CloudErrorKind::Rejected
                }
            }
            CloudError::Decode { .. } => CloudErrorKind::Malformed,
        }
    }
}
