// ABOUTME: Retry budgets for the polling loops in deploy and cleanup.
// ABOUTME: Each loop has its own fixed attempt count and sleep interval.

use serde::Deserialize;
use std::time::Duration;

/// A fixed (attempts, interval) pair for one polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PollBudget {
    pub attempts: u32,

    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl PollBudget {
    pub const fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }

    /// Upper bound on wall-clock time spent sleeping.
    pub fn total(&self) -> Duration {
        self.interval * self.attempts
    }
}

/// kubectl only takes whole seconds and reads `0s` as "wait forever".
pub const MIN_ROLLOUT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Waiting for the deployment object to show up after apply.
    pub deployment: PollBudget,

    /// Passed to the cluster's own rollout wait.
    #[serde(with = "humantime_serde")]
    pub rollout_timeout: Duration,

    /// Waiting for at least one running pod.
    pub pods: PollBudget,

    /// Waiting for the load balancer hostname on the ingress.
    pub ingress: PollBudget,

    /// Waiting for a deleted namespace to disappear.
    pub namespace_deletion: PollBudget,

    /// How often to log progress while waiting for namespace deletion.
    #[serde(with = "humantime_serde")]
    pub progress_every: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            deployment: PollBudget::new(30, Duration::from_secs(2)),
            rollout_timeout: Duration::from_secs(300),
            pods: PollBudget::new(30, Duration::from_secs(5)),
            ingress: PollBudget::new(30, Duration::from_secs(10)),
            namespace_deletion: PollBudget::new(60, Duration::from_secs(5)),
            progress_every: Duration::from_secs(30),
        }
    }
}

impl PollingConfig {
    /// Budgets that never sleep.
    pub fn immediate(attempts: u32) -> Self {
        let budget = PollBudget::new(attempts, Duration::ZERO);
        Self {
            deployment: budget,
            rollout_timeout: MIN_ROLLOUT_TIMEOUT,
            pods: budget,
            ingress: budget,
            namespace_deletion: budget,
            progress_every: Duration::ZERO,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let budgets = [
            ("deployment", &self.deployment),
            ("pods", &self.pods),
            ("ingress", &self.ingress),
            ("namespace_deletion", &self.namespace_deletion),
        ];
        for (name, budget) in budgets {
            if budget.attempts == 0 {
                return Err(format!("polling.{name}.attempts must be at least 1"));
            }
        }
        if self.rollout_timeout < MIN_ROLLOUT_TIMEOUT {
            return Err("polling.rollout_timeout must be at least 1s".to_string());
        }
        Ok(())
    }
}
