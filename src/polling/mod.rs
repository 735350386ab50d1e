//! Status convergence for asynchronous platform resources
//!
//! A flow submits work (a recording process, an audio upload) and then asks a
//! status endpoint about it until the resource converges. This module owns
//! that loop.
//!
//! # Shape
//!
//! ```text
//! PollRequest ──▶ poll() ──▶ StatusQuery::query ──▶ StatusRecord::normalize
//!                   ▲                                      │
//!                   │                                      ▼
//!              sleep(interval) ◀── InFlight ◀── PollState::advance(Verdict)
//!                                                          │
//!                                   Success / Failed / Exhausted / TransportError
//! ```
//!
//! Every observed value falls into exactly one of three buckets: done,
//! still pending, or anything else. Anything else fails the poll on the spot.
//! Worst-case wall time is `max_attempts × interval`.

mod poller;
mod state;
mod status;
mod strategy;

pub use poller::{poll, PollOutcome, PollRequest, StatusQuery};
pub use state::PollState;
pub use status::StatusRecord;
pub use strategy::{PollStrategy, Verdict};

/// Rejected poll configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollConfigError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("status values cannot be both terminal and in-flight: {0:?}")]
    OverlappingStates(Vec<String>),
}
