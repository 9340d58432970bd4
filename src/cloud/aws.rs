// ABOUTME: CloudOps implementation backed by the aws CLI.
// ABOUTME: Requests JSON output and filters the inventory locally.

use super::error::{CloudError, CommandFailedSnafu, DecodeSnafu, SpawnSnafu};
use super::ops::{Certificate, CloudOps, LoadBalancer, SecurityGroup};
use crate::exec;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt;

/// Tag the AWS load balancer controller puts on resources it creates.
pub const CLUSTER_TAG: &str = "elbv2.k8s.aws/cluster";

/// Queries AWS through the `aws` binary.
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: String,
}

impl Default for AwsCli {
    fn default() -> Self {
        Self::new("aws")
    }
}

impl AwsCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn query<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, CloudError> {
        let mut full_args = args.to_vec();
        full_args.extend(["--output", "json"]);
        let command = format!("{} {}", self.program, full_args.join(" "));

        let output = exec::run(&self.program, &full_args)
            .await
            .context(SpawnSnafu {
                program: self.program.clone(),
            })?;

        if !output.success() {
            return CommandFailedSnafu {
                command,
                stderr: output.stderr.trim().to_string(),
            }
            .fail();
        }

        serde_json::from_str(&output.stdout).context(DecodeSnafu { command })
    }
}

#[async_trait]
impl CloudOps for AwsCli {
    async fn find_certificates(
        &self,
        region: &str,
        domain_pattern: &str,
    ) -> Result<Vec<Certificate>, CloudError> {
        let list: CertificateList = self
            .query(&["acm", "list-certificates", "--region", region])
            .await?;
        Ok(list.matching(domain_pattern))
    }

    async fn find_load_balancers(
        &self,
        region: &str,
        name_contains: &str,
    ) -> Result<Vec<LoadBalancer>, CloudError> {
        let list: LoadBalancerList = self
            .query(&["elbv2", "describe-load-balancers", "--region", region])
            .await?;
        Ok(list.matching(name_contains))
    }

    async fn find_security_groups(
        &self,
        region: &str,
        cluster: Option<&str>,
        name_contains: &str,
    ) -> Result<Vec<SecurityGroup>, CloudError> {
        let filter = format!("Name=tag-key,Values={CLUSTER_TAG}");
        let list: SecurityGroupList = self
            .query(&[
                "ec2",
                "describe-security-groups",
                "--region",
                region,
                "--filters",
                &filter,
            ])
            .await?;
        Ok(list.matching(cluster, name_contains))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CertificateList {
    #[serde(default)]
    certificate_summary_list: Vec<CertificateSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CertificateSummary {
    certificate_arn: String,
    domain_name: String,
}

impl CertificateList {
    fn matching(self, domain_pattern: &str) -> Vec<Certificate> {
        self.certificate_summary_list
            .into_iter()
            .filter(|c| c.domain_name == domain_pattern)
            .map(|c| Certificate {
                arn: c.certificate_arn,
                domain: c.domain_name,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoadBalancerList {
    #[serde(default)]
    load_balancers: Vec<LoadBalancerEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoadBalancerEntry {
    load_balancer_name: String,
    load_balancer_arn: String,
    #[serde(rename = "DNSName", default)]
    dns_name: String,
}

impl LoadBalancerList {
    fn matching(self, name_contains: &str) -> Vec<LoadBalancer> {
        self.load_balancers
            .into_iter()
            .filter(|lb| lb.load_balancer_name.contains(name_contains))
            .map(|lb| LoadBalancer {
                name: lb.load_balancer_name,
                arn: lb.load_balancer_arn,
                dns_name: lb.dns_name,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SecurityGroupList {
    #[serde(default)]
    security_groups: Vec<SecurityGroupEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SecurityGroupEntry {
    group_id: String,
    group_name: String,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Tag {
    key: String,
    value: String,
}

impl SecurityGroupList {
    fn matching(self, cluster: Option<&str>, name_contains: &str) -> Vec<SecurityGroup> {
        self.security_groups
            .into_iter()
            .filter(|sg| sg.group_name.contains(name_contains))
            .filter(|sg| match cluster {
                Some(cluster) => sg
                    .tags
                    .iter()
                    .any(|t| t.key == CLUSTER_TAG && t.value == cluster),
                None => true,
            })
            .map(|sg| SecurityGroup {
                id: sg.group_id,
                name: sg.group_name,
            })
            .collect()
    }
}
