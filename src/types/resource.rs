// ABOUTME: Kubernetes resource kinds handled by the orchestrator.
// ABOUTME: Maps each kind to its kubectl name and manifest file.

use std::fmt;

/// Resource kinds that are applied, reported on, or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Namespace,
    Deployment,
    Pod,
    Service,
    Ingress,
    HorizontalPodAutoscaler,
    ClusterIssuer,
}

impl ResourceKind {
    /// Resource name as accepted by `kubectl get`.
    pub fn kubectl_name(&self) -> &'static str {
        match self {
            ResourceKind::Namespace => "namespace",
            ResourceKind::Deployment => "deployment",
            ResourceKind::Pod => "pods",
            ResourceKind::Service => "service",
            ResourceKind::Ingress => "ingress",
            ResourceKind::HorizontalPodAutoscaler => "hpa",
            ResourceKind::ClusterIssuer => "clusterissuer",
        }
    }

    /// Whether the resource lives inside a namespace.
    pub fn is_namespaced(&self) -> bool {
        !matches!(self, ResourceKind::Namespace | ResourceKind::ClusterIssuer)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::Namespace => "Namespace",
            ResourceKind::Deployment => "Deployment",
            ResourceKind::Pod => "Pods",
            ResourceKind::Service => "Service",
            ResourceKind::Ingress => "Ingress",
            ResourceKind::HorizontalPodAutoscaler => "HorizontalPodAutoscaler",
            ResourceKind::ClusterIssuer => "ClusterIssuer",
        };
        f.write_str(label)
    }
}

/// The five manifests of a deployment, in apply order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    Namespace,
    Deployment,
    Service,
    Hpa,
    Ingress,
}

impl ManifestKind {
    /// Fixed apply order. The namespace comes first so namespaced
    /// resources have somewhere to land.
    pub const APPLY_ORDER: [ManifestKind; 5] = [
        ManifestKind::Namespace,
        ManifestKind::Deployment,
        ManifestKind::Service,
        ManifestKind::Hpa,
        ManifestKind::Ingress,
    ];

    /// File name inside the manifests directory.
    pub fn filename(&self) -> &'static str {
        match self {
            ManifestKind::Namespace => "namespace.yaml",
            ManifestKind::Deployment => "deployment.yaml",
            ManifestKind::Service => "service.yaml",
            ManifestKind::Hpa => "hpa.yaml",
            ManifestKind::Ingress => "ingress.yaml",
        }
    }

    /// The ingress is rendered from a template at deploy time; the rest are static.
    pub fn is_rendered(&self) -> bool {
        matches!(self, ManifestKind::Ingress)
    }

    pub fn resource_kind(&self) -> ResourceKind {
        match self {
            ManifestKind::Namespace => ResourceKind::Namespace,
            ManifestKind::Deployment => ResourceKind::Deployment,
            ManifestKind::Service => ResourceKind::Service,
            ManifestKind::Hpa => ResourceKind::HorizontalPodAutoscaler,
            ManifestKind::Ingress => ResourceKind::Ingress,
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.filename())
    }
}
