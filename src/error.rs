//! Flow-level failures surfaced to scenarios.
//!
//! Every failure is returned as `Err`; flows never recover silently. The
//! display text names the failure kind and the last status or body seen.

use serde_json::Value;

use crate::polling::PollConfigError;
use crate::transport::TransportError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum FlowError {
    /// The call failed, returned non-2xx, or returned a non-JSON body
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Creating the async resource did not succeed
    #[error("Submission failed (status {status_code}): {body}")]
    Submission { status_code: u16, body: Value },

    /// Creation succeeded but the identifier the flow needs was absent
    #[error("Submission response has no usable '{field}': {body}")]
    MissingCorrelationId { field: String, body: Value },

    /// Status outside the known terminal and in-flight sets
    #[error("Unexpected status: {status:?} (body: {body})")]
    UnexpectedStatus { status: Option<String>, body: Value },

    /// Still in flight after every attempt
    #[error("Did not complete within {attempts} attempts (last status: {last_status:?})")]
    PollExhausted {
        attempts: u32,
        last_status: Option<String>,
    },

    /// Stream id never appeared on the recording process
    #[error("Stream ID was not available within {attempts} attempts")]
    StreamIdTimeout { attempts: u32 },

    #[error("Invalid poll configuration: {0}")]
    Config(#[from] PollConfigError),
}

impl FlowError {
    /// Timeout-kind failures: the resource never converged in the allotted
    /// attempts.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FlowError::PollExhausted { .. } | FlowError::StreamIdTimeout { .. }
        )
    }
}
