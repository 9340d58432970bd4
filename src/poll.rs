//! Bounded fixed-interval polling.
//!
//! Every wait in kubeploy (deployment existence, running pods, ingress
//! address, namespace deletion) goes through [`poll_until`]. There is no
//! backoff: the probe runs up to `attempts` times with `interval` between
//! attempts, and running out of budget is reported to the caller rather than
//! treated as an error.

use crate::config::PollBudget;
use std::future::Future;

/// Result of a bounded poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The probe produced a value on the given (1-based) attempt.
    Ready { value: T, attempts: u32 },
    /// The budget ran out after this many attempts.
    Exhausted { attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, PollOutcome::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Ready { attempts, .. } | PollOutcome::Exhausted { attempts } => *attempts,
        }
    }
}

/// Run `probe` until it yields `Some`, or until the budget is spent.
///
/// The probe receives the 1-based attempt number. No sleep follows the
/// final attempt, so a budget of N attempts sleeps N-1 times.
pub async fn poll_until<T, F, Fut>(budget: &PollBudget, what: &str, mut probe: F) -> PollOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for attempt in 1..=budget.attempts {
        if let Some(value) = probe(attempt).await {
            tracing::debug!(what, attempt, "poll succeeded");
            return PollOutcome::Ready {
                value,
                attempts: attempt,
            };
        }

        tracing::debug!(
            what,
            attempt,
            max_attempts = budget.attempts,
            "not ready, waiting {:?}",
            budget.interval
        );

        if attempt < budget.attempts && !budget.interval.is_zero() {
            tokio::time::sleep(budget.interval).await;
        }
    }

    PollOutcome::Exhausted {
        attempts: budget.attempts,
    }
}
