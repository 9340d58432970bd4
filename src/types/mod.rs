// ABOUTME: Validated domain types shared across the orchestrator.
// ABOUTME: Domain names and the Kubernetes resource kinds we manage.

mod domain_name;
mod resource;

pub use domain_name::{DomainName, DomainNameError};
pub use resource::{ManifestKind, ResourceKind};
