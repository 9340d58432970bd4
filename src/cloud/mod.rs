// ABOUTME: Cloud provider inventory access (certificates, load balancers, security groups).
// ABOUTME: Exposes the CloudOps trait and its aws CLI implementation.

mod aws;
mod error;
mod ops;

pub use aws::{AwsCli, CLUSTER_TAG};
pub use error::{CloudError, CloudErrorKind};
pub use ops::{Certificate, CloudOps, LoadBalancer, SecurityGroup};
