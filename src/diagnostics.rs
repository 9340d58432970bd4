// ABOUTME: Diagnostics accumulator for soft failures during deploy and cleanup.
// ABOUTME: Collects warnings that shouldn't fail a run but should be shown to users.

/// Collects non-fatal warnings during a run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if a warning of the given kind was collected.
    pub fn has(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Categories of soft failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A static manifest was missing and skipped.
    ManifestSkipped,
    /// No matching TLS certificate in the cloud inventory.
    CertificateMissing,
    /// The deployment object never appeared after apply.
    DeploymentNotObserved,
    /// The rollout did not finish within its timeout.
    RolloutTimeout,
    /// No pod reached the Running phase.
    PodsNotReady,
    /// The ingress never got a load balancer hostname.
    IngressAddressPending,
    /// The namespace was still present when the deletion budget ran out.
    NamespaceDeletionSlow,
    /// A load balancer outlived the namespace.
    OrphanedLoadBalancer,
    /// A security group outlived the namespace.
    OrphanedSecurityGroup,
    /// Something is still around after cleanup.
    RemainingResource,
    /// The cloud provider could not be queried.
    CloudAuditUnavailable,
    /// A post-deploy or on-error hook failed.
    HookFailed,
}
