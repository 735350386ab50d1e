//! The poll loop.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::state::PollState;
use super::status::StatusRecord;
use super::strategy::{PollStrategy, Verdict};
use super::PollConfigError;
use crate::transport::{ApiResponse, TransportError};

/// Asks the platform about one correlation id.
#[async_trait]
pub trait StatusQuery: Send + Sync {
    async fn query(&self, correlation_id: &str) -> Result<ApiResponse, TransportError>;
}

/// Immutable description of one polling operation.
#[derive(Debug, Clone)]
pub struct PollRequest {
    correlation_id: String,
    strategy: PollStrategy,
    max_attempts: u32,
    interval: Duration,
}

impl PollRequest {
    pub fn new(
        correlation_id: impl Into<String>,
        strategy: PollStrategy,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<Self, PollConfigError> {
        if max_attempts == 0 {
            return Err(PollConfigError::ZeroAttempts);
        }
        strategy.validate()?;
        Ok(Self {
            correlation_id: correlation_id.into(),
            strategy,
            max_attempts,
            interval,
        })
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn strategy(&self) -> &PollStrategy {
        &self.strategy
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// How a poll ended. Exactly one per [`poll`] call.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// Converged; see [`Verdict::Done`] for what the value holds
    Success(Value),
    /// Every attempt observed an in-flight state
    Exhausted {
        attempts: u32,
        last_status: Option<String>,
    },
    /// An attempt observed a status outside the known sets
    Failed {
        status: Option<String>,
        body: Value,
        attempts: u32,
    },
    /// The status query itself failed; not retried
    TransportError(TransportError),
}

/// Query until the strategy reports convergence, an unknown status shows up,
/// or `max_attempts` queries have been spent. Sleeps `interval` between
/// in-flight attempts only, so at most `max_attempts - 1` sleeps happen.
pub async fn poll(request: &PollRequest, query: &dyn StatusQuery) -> PollOutcome {
    let mut state = PollState::default();

    for attempt in 1..=request.max_attempts {
        let response = match query.query(&request.correlation_id).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!(
                    "Polling attempt {} for {} failed: {}",
                    attempt,
                    request.correlation_id,
                    e
                );
                return PollOutcome::TransportError(e);
            }
        };

        let body = match response.success_json() {
            Ok(body) => body,
            Err(e) => {
                log::warn!(
                    "Polling attempt {} for {} got unusable response: {}",
                    attempt,
                    request.correlation_id,
                    e
                );
                return PollOutcome::TransportError(e);
            }
        };

        let record = StatusRecord::normalize(body);
        let verdict = request.strategy.evaluate(&record);
        log::info!(
            "Polling attempt {}/{} for {}: {}",
            attempt,
            request.max_attempts,
            request.correlation_id,
            verdict.describe()
        );

        state = state.advance(&verdict, attempt, request.max_attempts);
        match &state {
            PollState::TerminalSuccess { .. } => {
                if let Verdict::Done(value) = verdict {
                    return PollOutcome::Success(value);
                }
            }
            PollState::TerminalFailure { status, .. } => {
                return PollOutcome::Failed {
                    status: status.clone(),
                    body: record.into_body(),
                    attempts: attempt,
                };
            }
            PollState::Exhausted {
                attempts,
                last_status,
            } => {
                return PollOutcome::Exhausted {
                    attempts: *attempts,
                    last_status: last_status.clone(),
                };
            }
            PollState::Pending | PollState::InFlight { .. } => {
                tokio::time::sleep(request.interval).await;
            }
        }
    }

    // max_attempts >= 1 and the last attempt always lands in a terminal state
    PollOutcome::Exhausted {
        attempts: request.max_attempts,
        last_status: None,
    }
}
