//! The retrying plan-generation loop.
//!
//! One generation attempt is: call the model, parse its text as a task
//! array. Each attempt produces an explicit [`Attempt`] outcome and the
//! loop inspects the variant: transient failures back off and retry up to
//! [`RetryPolicy::max_attempts`] total attempts, terminal failures
//! short-circuit immediately.
//!
//! The backoff is a fixed power of two with no jitter and no cap. Under a
//! synchronized burst of failures every in-flight request retries on the
//! same schedule; acceptable at this service's request volume.

use std::time::Duration;

use thiserror::Error;

use crate::model::{GenerationError, GenerationRequest, TextModel};
use crate::plan::task::Task;

/// Retry schedule for plan generation.
///
/// Between attempt `i` and `i + 1` (1-indexed, failures only) the loop
/// sleeps `base_delay * 2^i`: 2 s then 4 s with the defaults.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 behave as 1.
    pub max_attempts: u32,
    /// Unit delay the exponential schedule scales from.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after failed attempt `attempt` (1-indexed).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Outcome of a single generation attempt.
#[derive(Debug)]
pub enum Attempt {
    /// The model returned text that parsed as a task array.
    Success(Vec<Task>),
    /// The attempt failed in a way a retry may fix.
    Retryable(GenerationError),
    /// The attempt failed in a way no retry will fix.
    Terminal(GenerationError),
}

/// Errors from the full generation loop.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The goal was empty; no remote call was attempted.
    #[error("goal must not be empty")]
    EmptyGoal,

    /// All attempts failed (or a terminal failure ended the loop early).
    /// Carries the final attempt's cause.
    #[error("generation failed after {attempts} attempt(s): {source}")]
    Upstream {
        attempts: u32,
        #[source]
        source: GenerationError,
    },
}

/// Parse model output text as a task array.
pub fn parse_tasks(text: &str) -> Result<Vec<Task>, GenerationError> {
    serde_json::from_str(text).map_err(|e| GenerationError::MalformedOutput(e.to_string()))
}

/// Run one attempt: call the model and parse its output.
async fn run_attempt(model: &dyn TextModel, request: &GenerationRequest) -> Attempt {
    match model.generate(request).await {
        Ok(text) => match parse_tasks(&text) {
            Ok(tasks) => Attempt::Success(tasks),
            Err(e) => Attempt::Retryable(e),
        },
        Err(e) if e.is_transient() => Attempt::Retryable(e),
        Err(e) => Attempt::Terminal(e),
    }
}

/// Generate a task plan for `goal`, retrying transient failures.
///
/// The loop is strictly sequential and blocking for the calling task:
/// each backoff suspends only this request's future. It ends on the first
/// successful parse, on a terminal failure, or when the attempt budget is
/// exhausted, whichever comes first.
pub async fn generate_plan(
    model: &dyn TextModel,
    goal: &str,
    policy: &RetryPolicy,
) -> Result<Vec<Task>, PlanError> {
    if goal.is_empty() {
        return Err(PlanError::EmptyGoal);
    }

    let request = GenerationRequest::for_goal(goal);
    let budget = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match run_attempt(model, &request).await {
            Attempt::Success(tasks) => {
                tracing::info!(
                    model = model.name(),
                    attempt,
                    tasks = tasks.len(),
                    "plan generated"
                );
                return Ok(tasks);
            }
            Attempt::Terminal(e) => {
                tracing::error!(model = model.name(), attempt, error = %e, "terminal generation failure");
                return Err(PlanError::Upstream {
                    attempts: attempt,
                    source: e,
                });
            }
            Attempt::Retryable(e) => {
                if attempt >= budget {
                    tracing::error!(
                        model = model.name(),
                        attempts = attempt,
                        error = %e,
                        "generation failed, attempt budget exhausted"
                    );
                    return Err(PlanError::Upstream {
                        attempts: attempt,
                        source: e,
                    });
                }
                let delay = policy.backoff_delay(attempt);
                tracing::warn!(
                    model = model.name(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "generation attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
