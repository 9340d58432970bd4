// ABOUTME: Cloud provider inventory trait and the records it returns.
// ABOUTME: Certificates, load balancers, and security groups; read-only lookups.

use super::error::CloudError;
use async_trait::async_trait;

/// Read-only queries against the cloud provider's inventory.
#[async_trait]
pub trait CloudOps: Send + Sync {
    /// Certificates whose domain equals `domain_pattern` (a literal name or `*.parent`).
    async fn find_certificates(
        &self,
        region: &str,
        domain_pattern: &str,
    ) -> Result<Vec<Certificate>, CloudError>;

    /// Load balancers whose name contains `name_contains`.
    async fn find_load_balancers(
        &self,
        region: &str,
        name_contains: &str,
    ) -> Result<Vec<LoadBalancer>, CloudError>;

    /// Security groups created by the ingress controller for `cluster`
    /// whose name contains `name_contains`.
    async fn find_security_groups(
        &self,
        region: &str,
        cluster: Option<&str>,
        name_contains: &str,
    ) -> Result<Vec<SecurityGroup>, CloudError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub arn: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancer {
    pub name: String,
    pub arn: String,
    pub dns_name: String,
}

impl LoadBalancer {
    /// Manual command an operator can run to remove this load balancer.
    pub fn remediation(&self, region: &str) -> String {
        format!(
            "aws elbv2 delete-load-balancer --load-balancer-arn {} --region {}",
            self.arn, region
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
}

impl SecurityGroup {
    /// Manual command an operator can run to remove this security group.
    pub fn remediation(&self, region: &str) -> String {
        format!(
            "aws ec2 delete-security-group --group-id {} --region {}",
            self.id, region
        )
    }
}
