// ABOUTME: Configuration types and parsing for kubeploy.yml.
// ABOUTME: Every field has a default so the file itself is optional.

mod cluster;
mod deserialize;
mod init;
mod polling;

pub use cluster::ClusterConfig;
pub use init::init_config;
pub use polling::{PollBudget, PollingConfig};

use crate::error::{Error, Result};
use deserialize::deserialize_tools;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "kubeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "kubeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".kubeploy/config.yml";

/// Placeholder replaced with the validated domain in the ingress template.
pub const DOMAIN_PLACEHOLDER: &str = "DOMAIN_NAME";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base name shared by the deployment, service, ingress, and autoscaler.
    #[serde(default = "default_app")]
    pub app: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_manifests_dir")]
    pub manifests_dir: PathBuf,

    #[serde(default = "default_ingress_template")]
    pub ingress_template: String,

    /// Pod label selector. Defaults to `app=<app>`.
    #[serde(default)]
    pub selector: Option<String>,

    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default = "default_tools", deserialize_with = "deserialize_tools")]
    pub tools: NonEmpty<String>,

    #[serde(default = "default_certificate_check")]
    pub certificate_check: bool,

    #[serde(default = "default_issuers")]
    pub issuers: Vec<String>,

    /// Substring identifying cloud load balancers created for our ingress.
    #[serde(default)]
    pub load_balancer_pattern: Option<String>,

    #[serde(default)]
    pub polling: PollingConfig,
}

fn default_app() -> String {
    "nginx-demo".to_string()
}

fn default_namespace() -> String {
    "nginx-demo".to_string()
}

fn default_manifests_dir() -> PathBuf {
    PathBuf::from("k8s")
}

fn default_ingress_template() -> String {
    "ingress-template.yaml".to_string()
}

fn default_tools() -> NonEmpty<String> {
    NonEmpty {
        head: "kubectl".to_string(),
        tail: vec!["aws".to_string()],
    }
}

fn default_certificate_check() -> bool {
    true
}

fn default_issuers() -> Vec<String> {
    vec![
        "letsencrypt-prod".to_string(),
        "letsencrypt-staging".to_string(),
        "selfsigned-issuer".to_string(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: default_app(),
            namespace: default_namespace(),
            manifests_dir: default_manifests_dir(),
            ingress_template: default_ingress_template(),
            selector: None,
            cluster: ClusterConfig::default(),
            tools: default_tools(),
            certificate_check: default_certificate_check(),
            issuers: default_issuers(),
            load_balancer_pattern: None,
            polling: PollingConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or defaults if none exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("using config {}", path.display());
                return Ok(Self::load(path)?.anchored(dir));
            }
        }

        tracing::debug!("no config file in {}, using defaults", dir.display());
        Ok(Config::default().anchored(dir))
    }

    /// Resolve a relative manifests directory against `base`.
    pub fn anchored(mut self, base: &Path) -> Self {
        if self.manifests_dir.is_relative() {
            self.manifests_dir = base.join(&self.manifests_dir);
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.app.trim().is_empty() {
            return Err(Error::InvalidConfig("app cannot be empty".to_string()));
        }
        if self.namespace.trim().is_empty() {
            return Err(Error::InvalidConfig("namespace cannot be empty".to_string()));
        }
        self.polling.validate().map_err(Error::InvalidConfig)
    }

    /// Pod label selector for this app.
    pub fn selector(&self) -> String {
        self.selector
            .clone()
            .unwrap_or_else(|| format!("app={}", self.app))
    }

    /// Path of a static manifest or the ingress template.
    pub fn manifest_path(&self, filename: &str) -> PathBuf {
        self.manifests_dir.join(filename)
    }

    pub fn ingress_template_path(&self) -> PathBuf {
        self.manifest_path(&self.ingress_template)
    }

    /// Load balancer name fragment.
    ///
    /// The AWS load balancer controller names balancers
    /// `k8s-<namespace>-<ingress>-<hash>` with each part squashed to
    /// eight characters, so the default is derived from the namespace.
    pub fn load_balancer_pattern(&self) -> String {
        self.load_balancer_pattern.clone().unwrap_or_else(|| {
            let squashed: String = self
                .namespace
                .chars()
                .filter(|c| *c != '-')
                .take(8)
                .collect();
            format!("k8s-{squashed}")
        })
    }
}
