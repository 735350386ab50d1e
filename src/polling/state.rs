//! Poll state machine
//!
//! All transitions go through [`PollState::advance`], a pure function of the
//! current state and one attempt's verdict. The loop in `poller.rs` only
//! performs I/O and sleeps; it never decides.

use super::strategy::Verdict;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollState {
    /// No observation yet
    #[default]
    Pending,
    /// Latest observation says work is ongoing
    InFlight {
        attempt: u32,
        observed: Option<String>,
    },
    TerminalSuccess {
        attempt: u32,
    },
    /// Latest observation fell outside the known sets
    TerminalFailure {
        attempt: u32,
        status: Option<String>,
    },
    /// Attempts consumed while still in flight
    Exhausted {
        attempts: u32,
        last_status: Option<String>,
    },
}

impl PollState {
    /// (state, verdict for attempt `attempt` of `max_attempts`) -> next state
    ///
    /// Key rules:
    /// - Terminal states absorb further verdicts
    /// - A pending verdict on the last attempt exhausts the poll
    pub fn advance(&self, verdict: &Verdict, attempt: u32, max_attempts: u32) -> PollState {
        if self.is_terminal() {
            return self.clone();
        }

        match verdict {
            Verdict::Done(_) => PollState::TerminalSuccess { attempt },
            Verdict::Rejected { status } => PollState::TerminalFailure {
                attempt,
                status: status.clone(),
            },
            Verdict::Pending { observed } if attempt >= max_attempts => PollState::Exhausted {
                attempts: attempt,
                last_status: observed.clone(),
            },
            Verdict::Pending { observed } => PollState::InFlight {
                attempt,
                observed: observed.clone(),
            },
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::TerminalSuccess { .. }
                | PollState::TerminalFailure { .. }
                | PollState::Exhausted { .. }
        )
    }
}
