// ABOUTME: Target cluster identity and cloud region.
// ABOUTME: The expected kube context is compared by exact equality.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    /// Kube context the client must be bound to. Unset means any context.
    #[serde(default)]
    pub context: Option<String>,

    /// Cluster name used by the load balancer controller's resource tags.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            context: None,
            name: None,
            region: default_region(),
        }
    }
}
