//! How an observed status body is classified.

use serde_json::Value;
use std::collections::BTreeSet;

use super::status::StatusRecord;
use super::PollConfigError;

/// The two ways a flow decides a resource has converged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStrategy {
    /// Classify the body's `status` field. Values in `terminal` finish the
    /// poll, values in `in_flight` keep it going, anything else (including a
    /// missing status) fails it.
    StatusEnum {
        terminal: BTreeSet<String>,
        in_flight: BTreeSet<String>,
    },
    /// Wait for a field to appear. A non-blank string or a number finishes
    /// the poll; anything else (absent, null, blank, bool, object, array)
    /// keeps it going. There is no failure verdict.
    FieldPresence { pointer: String },
}

/// Result of classifying one observation.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Converged. Carries the full body for status polling, or the located
    /// field value for field-presence polling.
    Done(Value),
    /// Keep polling. `observed` is the status seen, if any.
    Pending { observed: Option<String> },
    /// Status outside the known sets.
    Rejected { status: Option<String> },
}

impl PollStrategy {
    pub fn status_enum(terminal: &[&str], in_flight: &[&str]) -> Self {
        PollStrategy::StatusEnum {
            terminal: terminal.iter().map(|s| s.to_string()).collect(),
            in_flight: in_flight.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn field_presence(pointer: &str) -> Self {
        PollStrategy::FieldPresence {
            pointer: pointer.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), PollConfigError> {
        match self {
            PollStrategy::StatusEnum {
                terminal,
                in_flight,
            } => {
                let overlap: Vec<String> = terminal.intersection(in_flight).cloned().collect();
                if overlap.is_empty() {
                    Ok(())
                } else {
                    Err(PollConfigError::OverlappingStates(overlap))
                }
            }
            PollStrategy::FieldPresence { .. } => Ok(()),
        }
    }

    pub fn evaluate(&self, record: &StatusRecord) -> Verdict {
        match self {
            PollStrategy::StatusEnum {
                terminal,
                in_flight,
            } => {
                let status = record.status().map(str::to_string);
                match status {
                    Some(s) if terminal.contains(&s) => Verdict::Done(record.body().clone()),
                    Some(s) if in_flight.contains(&s) => Verdict::Pending { observed: Some(s) },
                    other => Verdict::Rejected { status: other },
                }
            }
            PollStrategy::FieldPresence { pointer } => match record.field(pointer) {
                Some(Value::String(s)) if !s.trim().is_empty() => {
                    Verdict::Done(Value::String(s.clone()))
                }
                Some(value @ Value::Number(_)) => Verdict::Done(value.clone()),
                _ => Verdict::Pending {
                    observed: record.status().map(str::to_string),
                },
            },
        }
    }
}

impl Verdict {
    /// Short form for attempt logging.
    pub fn describe(&self) -> String {
        match self {
            Verdict::Done(_) => "done".to_string(),
            Verdict::Pending { observed } => {
                format!("pending (status={})", observed.as_deref().unwrap_or("-"))
            }
            Verdict::Rejected { status } => {
                format!("unexpected status {:?}", status)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transcript_strategy() -> PollStrategy {
        PollStrategy::status_enum(&["COMPLETED"], &["PROCESSING"])
    }

    fn record(body: Value) -> StatusRecord {
        StatusRecord::normalize(body)
    }

    #[test]
    fn terminal_status_is_done_with_body() {
        let body = json!({ "status": "COMPLETED", "text": "hello" });
        let verdict = transcript_strategy().evaluate(&record(body.clone()));
        assert_eq!(verdict, Verdict::Done(body));
    }

    #[test]
    fn in_flight_status_is_pending() {
        let verdict = transcript_strategy().evaluate(&record(json!({ "status": "PROCESSING" })));
        assert_eq!(
            verdict,
            Verdict::Pending {
                observed: Some("PROCESSING".to_string())
            }
        );
    }

    #[test]
    fn unknown_and_missing_status_are_rejected() {
        let strategy = transcript_strategy();
        assert_eq!(
            strategy.evaluate(&record(json!({ "status": "FAILED" }))),
            Verdict::Rejected {
                status: Some("FAILED".to_string())
            }
        );
        assert_eq!(
            strategy.evaluate(&record(json!({ "text": "no status" }))),
            Verdict::Rejected { status: None }
        );
    }

    #[test]
    fn overlapping_sets_fail_validation() {
        let strategy = PollStrategy::status_enum(&["COMPLETED", "PROCESSING"], &["PROCESSING"]);
        assert_eq!(
            strategy.validate(),
            Err(PollConfigError::OverlappingStates(vec![
                "PROCESSING".to_string()
            ]))
        );
        assert!(transcript_strategy().validate().is_ok());
    }

    #[test]
    fn field_presence_waits_through_null_blank_and_missing() {
        let strategy = PollStrategy::field_presence("/recordingProcessContainers/0/streamId");
        for body in [
            json!([]),
            json!([{ "recordingProcessContainers": [] }]),
            json!([{ "recordingProcessContainers": [{ "streamId": null }] }]),
            json!([{ "recordingProcessContainers": [{ "streamId": "  " }] }]),
        ] {
            assert!(
                matches!(strategy.evaluate(&record(body.clone())), Verdict::Pending { .. }),
                "expected pending for {}",
                body
            );
        }
    }

    #[test]
    fn field_presence_waits_through_falsy_values() {
        let strategy = PollStrategy::field_presence("/streamId");
        for value in [json!(false), json!(true), json!({}), json!([]), json!([""])] {
            let verdict = strategy.evaluate(&record(json!({ "streamId": value.clone() })));
            assert!(
                matches!(verdict, Verdict::Pending { .. }),
                "expected pending for {}",
                value
            );
        }
        assert_eq!(
            strategy.evaluate(&record(json!({ "streamId": 42 }))),
            Verdict::Done(json!(42))
        );
    }

    #[test]
    fn field_presence_ignores_status_values() {
        // No failure verdict exists for this strategy, even for odd statuses.
        let strategy = PollStrategy::field_presence("/streamId");
        let verdict = strategy.evaluate(&record(json!({ "status": "FAILED" })));
        assert!(matches!(verdict, Verdict::Pending { .. }));
    }

    #[test]
    fn field_presence_returns_the_field() {
        let strategy = PollStrategy::field_presence("/recordingProcessContainers/0/streamId");
        let verdict = strategy.evaluate(&record(json!([{
            "recordingProcessContainers": [{ "streamId": "abc-123" }]
        }])));
        assert_eq!(verdict, Verdict::Done(json!("abc-123")));
    }
}
